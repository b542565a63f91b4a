use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::show::category::Side;
use crate::show::dataset::QuestionDataset;
use crate::show::session::Session;
use crate::ui::theme::Theme;

/// Team names and scores, right team on the right. The turn holder is
/// highlighted only while the turn indicator is switched on.
pub struct Scoreboard<'a> {
    session: &'a Session,
    dataset: &'a QuestionDataset,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> Scoreboard<'a> {
    pub fn new(
        session: &'a Session,
        dataset: &'a QuestionDataset,
        title: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            dataset,
            title,
            theme,
        }
    }

    fn team(&self, side: Side, team_color: Color) -> Paragraph<'a> {
        let colors = &self.theme.colors;
        let holds_turn = self.session.turn_changed && self.session.turn_holder() == side;
        let bg = if holds_turn {
            colors.turn_bg()
        } else {
            colors.header_bg()
        };
        let name = self.dataset.team_name(side);
        let marker = if holds_turn { " *" } else { "" };
        let line = Line::from(vec![
            Span::styled(
                format!(" {name}{marker} "),
                Style::default().fg(team_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", self.session.score(side)),
                Style::default().fg(colors.header_fg()).add_modifier(Modifier::BOLD),
            ),
        ]);
        let alignment = match side {
            Side::Left => Alignment::Left,
            Side::Right => Alignment::Right,
        };
        Paragraph::new(line)
            .alignment(alignment)
            .style(Style::default().bg(bg))
    }
}

impl Widget for Scoreboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(30),
                Constraint::Percentage(35),
            ])
            .split(inner);

        self.team(Side::Left, colors.left_team()).render(columns[0], buf);
        Paragraph::new(Span::styled(
            self.title,
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(columns[1], buf);
        self.team(Side::Right, colors.right_team()).render(columns[2], buf);
    }
}
