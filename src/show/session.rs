use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::show::category::{Category, Side};

/// Live state of the running show. Lives for the whole event, never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub left_score: i32,
    pub right_score: i32,
    pub rights_turn: bool,
    pub turn_changed: bool,
    pub progress: BTreeMap<Category, usize>,
    /// Sub-question position per (category, set), kept across screen mounts.
    pub walks: BTreeMap<(Category, usize), SetWalk>,
}

/// How far the operator got inside one set of a walked category. Leaving and
/// re-entering the set keeps it; it starts over only when the set changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetWalk {
    pub cursor: usize,
    pub bonus_granted: bool,
}

impl Session {
    pub fn score(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    pub fn turn_holder(&self) -> Side {
        if self.rights_turn { Side::Right } else { Side::Left }
    }
}

/// Sole owner of [`Session`]. Every operation is total and synchronous.
#[derive(Debug, Default)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn score(&self, side: Side) -> i32 {
        self.session.score(side)
    }

    pub fn turn_holder(&self) -> Side {
        self.session.turn_holder()
    }

    /// Plain integer add; scores may go negative.
    pub fn adjust_score(&mut self, side: Side, delta: i32) {
        if delta == 0 {
            return;
        }
        let score = self.score_mut(side);
        *score = score.saturating_add(delta);
        info!(side = side.as_str(), delta, score = *score, "score adjusted");
    }

    pub fn set_score(&mut self, side: Side, value: i32) {
        *self.score_mut(side) = value;
        info!(side = side.as_str(), score = value, "score set");
    }

    pub fn toggle_turn(&mut self) {
        self.session.rights_turn = !self.session.rights_turn;
        debug!(holder = self.turn_holder().as_str(), "turn flipped");
    }

    pub fn set_turn(&mut self, holder: Side) {
        self.session.rights_turn = holder == Side::Right;
        debug!(holder = holder.as_str(), "turn set");
    }

    pub fn set_turn_changed(&mut self, changed: bool) {
        self.session.turn_changed = changed;
    }

    pub fn turn_changed(&self) -> bool {
        self.session.turn_changed
    }

    /// Step the category cursor, wrapping to 0 once it would reach `len`.
    /// Hosts reuse sequences across rounds, so the cursor cycles rather than
    /// clamping at the end.
    pub fn advance_progress(&mut self, category: Category, len: usize) -> usize {
        let cursor = self.session.progress.entry(category).or_insert(0);
        let next = *cursor + 1;
        *cursor = if next >= len { 0 } else { next };
        debug!(category = category.as_str(), cursor = *cursor, "progress advanced");
        *cursor
    }

    pub fn read_progress(&self, category: Category) -> usize {
        self.session.progress.get(&category).copied().unwrap_or(0)
    }

    /// Progress as a usable index into a sequence of `len` entries; anything
    /// out of range reads as 0.
    pub fn current_index(&self, category: Category, len: usize) -> usize {
        let cursor = self.read_progress(category);
        if cursor < len { cursor } else { 0 }
    }

    pub fn set_walk(&self, category: Category, set: usize) -> SetWalk {
        self.session
            .walks
            .get(&(category, set))
            .copied()
            .unwrap_or_default()
    }

    pub fn record_walk(&mut self, category: Category, set: usize, walk: SetWalk) {
        self.session.walks.insert((category, set), walk);
    }

    /// Back to the first sub-question with the bonus unpaid.
    pub fn restart_walk(&mut self, category: Category, set: usize) {
        if self.session.walks.remove(&(category, set)).is_some() {
            debug!(category = category.as_str(), set, "set walk restarted");
        }
    }

    fn score_mut(&mut self, side: Side) -> &mut i32 {
        match side {
            Side::Left => &mut self.session.left_score,
            Side::Right => &mut self.session.right_score,
        }
    }
}

/// Leading-integer parse for operator-typed scores: `"12abc"` reads as 12,
/// anything without leading digits reads as 0.
pub fn parse_score(text: &str) -> i32 {
    let trimmed = text.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    let value = digits[..end].parse::<i32>().unwrap_or(0);
    if negative { -value } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed_with_left_holding_turn() {
        let store = SessionStore::new();
        assert_eq!(store.score(Side::Left), 0);
        assert_eq!(store.score(Side::Right), 0);
        assert!(!store.session().rights_turn);
        assert!(!store.turn_changed());
        assert_eq!(store.turn_holder(), Side::Left);
    }

    #[test]
    fn scores_may_go_negative() {
        let mut store = SessionStore::new();
        store.adjust_score(Side::Left, -20);
        store.adjust_score(Side::Right, 15);
        store.adjust_score(Side::Right, -5);
        assert_eq!(store.score(Side::Left), -20);
        assert_eq!(store.score(Side::Right), 10);
    }

    #[test]
    fn toggle_turn_flips_holder() {
        let mut store = SessionStore::new();
        store.toggle_turn();
        assert_eq!(store.turn_holder(), Side::Right);
        store.toggle_turn();
        assert_eq!(store.turn_holder(), Side::Left);
    }

    #[test]
    fn progress_wraps_to_zero_at_len() {
        let mut store = SessionStore::new();
        let c = Category::AudienceQuestions;
        assert_eq!(store.advance_progress(c, 3), 1);
        assert_eq!(store.advance_progress(c, 3), 2);
        assert_eq!(store.advance_progress(c, 3), 0);
        assert_eq!(store.read_progress(c), 0);
    }

    #[test]
    fn progress_on_empty_category_stays_zero() {
        let mut store = SessionStore::new();
        assert_eq!(store.advance_progress(Category::QuickQuestions, 0), 0);
        assert_eq!(store.advance_progress(Category::QuickQuestions, 1), 0);
    }

    #[test]
    fn current_index_wraps_stale_cursor() {
        let mut store = SessionStore::new();
        let c = Category::QuickQuestions;
        store.advance_progress(c, 5);
        store.advance_progress(c, 5);
        assert_eq!(store.current_index(c, 5), 2);
        // Dataset shrank underneath the cursor.
        assert_eq!(store.current_index(c, 2), 0);
    }

    #[test]
    fn set_walks_are_kept_per_set_until_restarted() {
        let mut store = SessionStore::new();
        let c = Category::QuickQuestions;
        assert_eq!(store.set_walk(c, 0), SetWalk::default());

        let walk = SetWalk {
            cursor: 3,
            bonus_granted: true,
        };
        store.record_walk(c, 0, walk);
        assert_eq!(store.set_walk(c, 0), walk);
        assert_eq!(store.set_walk(c, 1), SetWalk::default());

        store.restart_walk(c, 0);
        assert_eq!(store.set_walk(c, 0), SetWalk::default());
    }

    #[test]
    fn parse_score_is_lenient() {
        assert_eq!(parse_score("42"), 42);
        assert_eq!(parse_score(" -7 "), -7);
        assert_eq!(parse_score("12abc"), 12);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("-"), 0);
        assert_eq!(parse_score("99999999999"), 0);
    }
}
