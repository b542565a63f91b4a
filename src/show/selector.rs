/// Two-phase "arm, then confirm" option selection used by every menu screen.
/// A first press of a digit only highlights it; pressing the same non-zero
/// digit again confirms it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selector {
    #[default]
    Idle,
    Highlighted(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Armed(u8),
    Confirmed(u8),
    OutOfRange,
}

impl Selector {
    /// Feed a digit; `max` is the highest option the screen offers.
    pub fn press(&mut self, digit: u8, max: u8) -> Selection {
        if digit > max {
            return Selection::OutOfRange;
        }
        if *self == Selector::Highlighted(digit) && digit != 0 {
            *self = Selector::Idle;
            return Selection::Confirmed(digit);
        }
        *self = Selector::Highlighted(digit);
        Selection::Armed(digit)
    }

    pub fn highlighted(self) -> Option<u8> {
        match self {
            Selector::Idle => None,
            Selector::Highlighted(n) => Some(n),
        }
    }

    pub fn reset(&mut self) {
        *self = Selector::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_press_only_arms() {
        let mut sel = Selector::Idle;
        assert_eq!(sel.press(3, 8), Selection::Armed(3));
        assert_eq!(sel.highlighted(), Some(3));
    }

    #[test]
    fn same_digit_twice_confirms() {
        let mut sel = Selector::Idle;
        sel.press(3, 8);
        assert_eq!(sel.press(3, 8), Selection::Confirmed(3));
        assert_eq!(sel, Selector::Idle);
    }

    #[test]
    fn different_digits_rearm() {
        let mut sel = Selector::Idle;
        sel.press(3, 8);
        assert_eq!(sel.press(4, 8), Selection::Armed(4));
        assert_eq!(sel.press(3, 8), Selection::Armed(3));
        assert_eq!(sel.press(3, 8), Selection::Confirmed(3));
    }

    #[test]
    fn zero_never_confirms() {
        let mut sel = Selector::Idle;
        assert_eq!(sel.press(0, 5), Selection::Armed(0));
        assert_eq!(sel.press(0, 5), Selection::Armed(0));
        assert_eq!(sel.highlighted(), Some(0));
    }

    #[test]
    fn out_of_range_leaves_state_alone() {
        let mut sel = Selector::Idle;
        sel.press(2, 5);
        assert_eq!(sel.press(6, 5), Selection::OutOfRange);
        assert_eq!(sel.press(2, 5), Selection::Confirmed(2));
    }

    #[test]
    fn confirm_then_press_again_arms() {
        let mut sel = Selector::Idle;
        sel.press(1, 5);
        sel.press(1, 5);
        assert_eq!(sel.press(1, 5), Selection::Armed(1));
    }
}
