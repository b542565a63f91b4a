use crossterm::event::KeyEvent;

use crate::show::category::Side;
use crate::show::session::{SessionStore, parse_score};
use crate::ui::line_input::{InputResult, LineInput};

/// Rating fields in display order, with the side each one credits.
pub const RATE_FIELDS: [(Side, &str); 6] = [
    (Side::Right, "Judge"),
    (Side::Right, "Guest"),
    (Side::Right, "Audience"),
    (Side::Left, "Judge"),
    (Side::Left, "Guest"),
    (Side::Left, "Audience"),
];

/// Outcome of a key press inside a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    Editing,
    Submit,
    Cancel,
}

/// A fixed list of single-line fields with one of them focused.
#[derive(Clone, Debug)]
pub struct FieldSet<const N: usize> {
    pub fields: [LineInput; N],
    pub focused: usize,
}

impl<const N: usize> FieldSet<N> {
    fn new(fields: [LineInput; N]) -> Self {
        Self { fields, focused: 0 }
    }

    pub fn handle(&mut self, key: KeyEvent) -> FormAction {
        let Some(field) = self.fields.get_mut(self.focused) else {
            return FormAction::Editing;
        };
        match field.handle(key) {
            InputResult::Continue => {}
            InputResult::Submit => return FormAction::Submit,
            InputResult::Cancel => return FormAction::Cancel,
            InputResult::Next => self.focused = (self.focused + 1) % N,
            InputResult::Prev => self.focused = (self.focused + N - 1) % N,
        }
        FormAction::Editing
    }

    pub fn value(&self, index: usize) -> i32 {
        self.fields.get(index).map_or(0, |f| parse_score(f.value()))
    }
}

/// Judges' ratings for both teams.
#[derive(Clone, Debug)]
pub struct RateForm {
    pub inputs: FieldSet<6>,
}

impl Default for RateForm {
    fn default() -> Self {
        Self {
            inputs: FieldSet::new(Default::default()),
        }
    }
}

impl RateForm {
    /// Sum of the fields belonging to `side`; unparseable text counts as 0.
    pub fn total(&self, side: Side) -> i32 {
        RATE_FIELDS
            .iter()
            .enumerate()
            .filter(|(_, (owner, _))| *owner == side)
            .map(|(i, _)| self.inputs.value(i))
            .sum()
    }

    pub fn apply(&self, session: &mut SessionStore) {
        for side in [Side::Right, Side::Left] {
            session.adjust_score(side, self.total(side));
        }
    }
}

/// Direct score override, prefilled with the current scores.
#[derive(Clone, Debug)]
pub struct ScoreForm {
    pub inputs: FieldSet<2>,
}

impl ScoreForm {
    pub fn from_session(session: &SessionStore) -> Self {
        let field = |side| LineInput::new(&session.score(side).to_string());
        Self {
            inputs: FieldSet::new([field(Side::Right), field(Side::Left)]),
        }
    }

    pub fn side(index: usize) -> Side {
        if index == 0 { Side::Right } else { Side::Left }
    }

    pub fn apply(&self, session: &mut SessionStore) {
        for i in 0..2 {
            session.set_score(Self::side(i), self.inputs.value(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<const N: usize>(set: &mut FieldSet<N>, text: &str) {
        for ch in text.chars() {
            set.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn rate_totals_parse_safely_per_side() {
        let mut form = RateForm::default();
        type_text(&mut form.inputs, "10");
        form.inputs.handle(key(KeyCode::Tab));
        type_text(&mut form.inputs, "5abc");
        form.inputs.handle(key(KeyCode::Tab));
        type_text(&mut form.inputs, "x");
        form.inputs.handle(key(KeyCode::Tab));
        type_text(&mut form.inputs, "7");
        assert_eq!(form.total(Side::Right), 15);
        assert_eq!(form.total(Side::Left), 7);

        let mut session = SessionStore::new();
        form.apply(&mut session);
        assert_eq!(session.score(Side::Right), 15);
        assert_eq!(session.score(Side::Left), 7);
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = RateForm::default();
        form.inputs.handle(key(KeyCode::Up));
        assert_eq!(form.inputs.focused, 5);
        form.inputs.handle(key(KeyCode::Down));
        assert_eq!(form.inputs.focused, 0);
        assert_eq!(form.inputs.handle(key(KeyCode::Enter)), FormAction::Submit);
        assert_eq!(form.inputs.handle(key(KeyCode::Esc)), FormAction::Cancel);
    }

    #[test]
    fn score_form_overrides_both_scores() {
        let mut session = SessionStore::new();
        session.adjust_score(Side::Left, 12);
        let mut form = ScoreForm::from_session(&session);
        assert_eq!(form.inputs.fields[1].value(), "12");

        type_text(&mut form.inputs, "0");
        form.inputs.handle(key(KeyCode::Tab));
        form.inputs.handle(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_text(&mut form.inputs, "oops");
        form.apply(&mut session);
        assert_eq!(session.score(Side::Right), 0);
        assert_eq!(session.score(Side::Left), 0);
    }
}
