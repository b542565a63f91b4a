use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: u8,
    pub label: String,
    pub done: bool,
}

/// Numbered option list. The armed digit is highlighted until it is pressed
/// again (confirm) or another digit replaces it.
pub struct Menu<'a> {
    pub title: String,
    pub items: Vec<MenuItem>,
    pub armed: Option<u8>,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(title: &str, items: Vec<MenuItem>, armed: Option<u8>, theme: &'a Theme) -> Self {
        Self {
            title: title.to_string(),
            items,
            armed,
            theme,
        }
    }

    /// Items `1..=count` labelled "Question n", marking done ones.
    pub fn numbered(count: usize, done: impl Fn(usize) -> bool) -> Vec<MenuItem> {
        (0..count.min(9))
            .map(|i| MenuItem {
                key: (i + 1) as u8,
                label: format!("Question {}", i + 1),
                done: done(i),
            })
            .collect()
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                &*self.title,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        if self.items.is_empty() {
            Paragraph::new(Span::styled(
                "(nothing loaded)",
                Style::default().fg(colors.text_muted()),
            ))
            .alignment(Alignment::Center)
            .render(layout[1], buf);
            return;
        }

        let lines: Vec<Line> = self
            .items
            .iter()
            .map(|item| {
                let armed = self.armed == Some(item.key);
                let indicator = if armed { ">" } else { " " };
                let mark = if item.done { "  (done)" } else { "" };
                let text = format!(" {indicator} [{}] {}{mark}", item.key, item.label);
                let style = if armed {
                    Style::default()
                        .fg(colors.bg())
                        .bg(colors.armed())
                        .add_modifier(Modifier::BOLD)
                } else if item.done {
                    Style::default().fg(colors.done())
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(Span::styled(text, style))
            })
            .collect();

        Paragraph::new(lines).render(layout[1], buf);
    }
}
