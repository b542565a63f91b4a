use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::show::category::{Category, WindowTopic};
use crate::show::dataset::{Question, QuestionRef};
use crate::ui::theme::Theme;

pub struct QuestionView<'a> {
    at: QuestionRef,
    question: &'a Question,
    /// Number of questions in the enclosing group, for "n/len" captions.
    group_len: usize,
    reveal: bool,
    media_shown: bool,
    theme: &'a Theme,
}

impl<'a> QuestionView<'a> {
    pub fn new(at: QuestionRef, question: &'a Question, group_len: usize, theme: &'a Theme) -> Self {
        Self {
            at,
            question,
            group_len,
            reveal: false,
            media_shown: false,
            theme,
        }
    }

    pub fn reveal(mut self, reveal: bool) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn media_shown(mut self, shown: bool) -> Self {
        self.media_shown = shown;
        self
    }
}

/// Block title naming where the question sits in the show.
pub fn caption(at: QuestionRef, group_len: usize) -> String {
    let sub = at.sub.unwrap_or(0) + 1;
    match at.category {
        Category::QuickQuestions => format!(
            "{} | set {} | {sub}/{}",
            at.category.label(),
            at.index + 1,
            group_len.max(sub)
        ),
        Category::Windows => {
            let topic = WindowTopic::from_index(at.index).map_or("?", WindowTopic::label);
            format!("{} | {topic} | {sub}", at.category.label())
        }
        category => format!("{} | {}", category.label(), at.index + 1),
    }
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut title = format!(" {} ", caption(self.at, self.group_len));
        if self.question.done {
            title.push_str("(done) ");
        }
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                &*self.question.text,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
        ];

        if self.reveal {
            if let Some(answer) = &self.question.answer {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("Answer: {answer}"),
                    Style::default().fg(colors.answer()),
                )));
            }
        }

        if self.media_shown {
            lines.push(Line::from(""));
            let media = self.question.media_ref.as_deref().unwrap_or("(no media)");
            lines.push(Line::from(Span::styled(
                format!("Media: {media}"),
                Style::default().fg(colors.text_muted()),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_for_quick_set() {
        let at = QuestionRef::new(Category::QuickQuestions, 1).with_sub(2);
        assert_eq!(caption(at, 4), "Quick Questions | set 2 | 3/4");
    }

    #[test]
    fn caption_for_window_topic() {
        let at = QuestionRef::new(Category::Windows, WindowTopic::Arts.index()).with_sub(0);
        assert_eq!(caption(at, 3), format!("{} | {} | 1", Category::Windows.label(), WindowTopic::Arts.label()));
    }

    #[test]
    fn caption_for_flat_question() {
        let at = QuestionRef::new(Category::Debate, 0);
        assert_eq!(caption(at, 0), format!("{} | 1", Category::Debate.label()));
    }
}
