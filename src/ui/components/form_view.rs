use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Labelled input fields stacked vertically; the focused one shows a cursor.
pub struct FormView<'a> {
    title: &'a str,
    rows: Vec<(String, &'a LineInput)>,
    focused: usize,
    theme: &'a Theme,
}

impl<'a> FormView<'a> {
    pub fn new(
        title: &'a str,
        rows: Vec<(String, &'a LineInput)>,
        focused: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            rows,
            focused,
            theme,
        }
    }
}

impl Widget for FormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let label_width = self
            .rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = vec![Line::from("")];
        for (i, (label, input)) in self.rows.iter().enumerate() {
            let is_focused = i == self.focused;
            let indicator = if is_focused { " > " } else { "   " };
            let label_style = Style::default()
                .fg(if is_focused { colors.accent() } else { colors.fg() })
                .add_modifier(if is_focused {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let mut spans = vec![Span::styled(
                format!("{indicator}{label:<label_width$}  "),
                label_style,
            )];
            if is_focused {
                let (before, cursor, after) = input.render_parts();
                spans.push(Span::styled(before.to_string(), Style::default().fg(colors.fg())));
                let cursor_text = cursor.map_or(" ".to_string(), |c| c.to_string());
                spans.push(Span::styled(
                    cursor_text,
                    Style::default().fg(colors.bg()).bg(colors.fg()),
                ));
                spans.push(Span::styled(after.to_string(), Style::default().fg(colors.fg())));
            } else {
                spans.push(Span::styled(
                    input.value().to_string(),
                    Style::default().fg(colors.text_muted()),
                ));
            }
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
