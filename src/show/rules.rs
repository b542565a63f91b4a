use serde::{Deserialize, Serialize};

use crate::show::category::{Category, Side};
use crate::show::cue::Cue;
use crate::show::dataset::Question;

/// Scoring and timing constants of the show. Near-duplicate categories use
/// different numbers (chase vs. ask-smartly penalties); each one has its own
/// name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowRules {
    pub quick_points: i32,
    pub quick_terminal_bonus: i32,
    pub quick_duration: u32,
    pub puzzle_duration: u32,
    pub window_duration: u32,
    pub debate_durations: [u32; 2],
    pub chase_bonus: i32,
    pub chase_penalty: i32,
    pub chase_penalty_cap: u32,
    pub chase_duration: u32,
    pub ask_penalty: i32,
    pub ask_bonus: i32,
    pub ask_duration: u32,
}

impl Default for ShowRules {
    fn default() -> Self {
        Self {
            quick_points: 1,
            quick_terminal_bonus: 1,
            quick_duration: 60,
            puzzle_duration: 30,
            window_duration: 30,
            debate_durations: [45, 90],
            chase_bonus: 15,
            chase_penalty: 5,
            chase_penalty_cap: 3,
            chase_duration: 15,
            ask_penalty: 20,
            ask_bonus: 20,
            ask_duration: 120,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    Keep,
    Toggle,
    /// Set the completion flag for exactly one frame.
    Pulse,
}

/// Which side a score delta lands on, read before any turn change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreTarget {
    Holder,
    Opponent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnChange {
    Keep,
    Flip,
    Give(Side),
}

/// What a correct/wrong press does. Applied in field order: score, turn,
/// timer, reveal, cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEffect {
    pub points: i32,
    pub target: ScoreTarget,
    pub penalty_cap: Option<u32>,
    pub turn: TurnChange,
    pub pause_timer: bool,
    pub reset_duration: Option<u32>,
    pub reveal: Reveal,
    pub advance: bool,
    pub cue: Option<Cue>,
}

impl KeyEffect {
    pub const NONE: KeyEffect = KeyEffect {
        points: 0,
        target: ScoreTarget::Holder,
        penalty_cap: None,
        turn: TurnChange::Keep,
        pause_timer: false,
        reset_duration: None,
        reveal: Reveal::Keep,
        advance: false,
        cue: None,
    };

    fn award(self, points: i32) -> Self {
        Self { points, ..self }
    }

    fn against(self, target: ScoreTarget) -> Self {
        Self { target, ..self }
    }

    fn capped(self, cap: u32) -> Self {
        Self {
            penalty_cap: Some(cap),
            ..self
        }
    }

    fn turn(self, turn: TurnChange) -> Self {
        Self { turn, ..self }
    }

    fn pause(self) -> Self {
        Self {
            pause_timer: true,
            ..self
        }
    }

    fn reset_to(self, seconds: u32) -> Self {
        Self {
            reset_duration: Some(seconds),
            ..self
        }
    }

    fn reveal(self, reveal: Reveal) -> Self {
        Self { reveal, ..self }
    }

    fn advance(self) -> Self {
        Self {
            advance: true,
            ..self
        }
    }

    fn cue(self, cue: Cue) -> Self {
        Self {
            cue: Some(cue),
            ..self
        }
    }

    pub fn is_noop(&self) -> bool {
        *self == Self::NONE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtraEffect {
    None,
    /// Hand over to the rating screen.
    Rate,
    /// Fixed bonus to the turn holder.
    Award(i32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DigitEffect {
    None,
    /// Digit `n` resets the countdown to the n-th duration and pulses.
    Durations(Vec<u32>),
    /// This digit moves to the next question set and flips the turn.
    AdvanceSet(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvancePolicy {
    None,
    /// Sub-question cursor walks to the last sub-question; answering that one
    /// correctly pays a one-shot bonus.
    LinearWithTerminalBonus { bonus: i32 },
    TurnAlternating,
    /// Each selection moves the category cursor, wrapping at the end.
    Cyclic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    /// `None` marks an untimed category (no countdown at all).
    pub default_duration: Option<u32>,
    pub correct: KeyEffect,
    pub wrong: KeyEffect,
    pub extra: ExtraEffect,
    pub digits: DigitEffect,
    pub advance: AdvancePolicy,
    pub uses_turn: bool,
    /// `m` toggles the done flag of the shown question.
    pub tracks_done: bool,
    /// The done flag is toggled once when the question screen mounts.
    pub auto_done_on_enter: bool,
}

impl CategoryRule {
    /// Countdown length for `question`, or `None` for untimed categories.
    pub fn duration_for(&self, question: &Question) -> Option<u32> {
        let fallback = self.default_duration?;
        Some(question.duration_seconds.unwrap_or(fallback))
    }

    pub fn is_timed(&self) -> bool {
        self.default_duration.is_some()
    }
}

/// One rule per category, built from the configured constants.
#[derive(Clone, Debug)]
pub struct CategoryRuleTable {
    rules: [CategoryRule; 8],
}

impl CategoryRuleTable {
    pub fn new(constants: &ShowRules) -> Self {
        Self {
            rules: Category::ALL.map(|category| rule_for(category, constants)),
        }
    }

    pub fn get(&self, category: Category) -> &CategoryRule {
        &self.rules[category as usize]
    }
}

impl Default for CategoryRuleTable {
    fn default() -> Self {
        Self::new(&ShowRules::default())
    }
}

fn rule_for(category: Category, k: &ShowRules) -> CategoryRule {
    let base = CategoryRule {
        category,
        default_duration: None,
        correct: KeyEffect::NONE,
        wrong: KeyEffect::NONE,
        extra: ExtraEffect::None,
        digits: DigitEffect::None,
        advance: AdvancePolicy::None,
        uses_turn: false,
        tracks_done: false,
        auto_done_on_enter: false,
    };
    let fx = KeyEffect::NONE;

    match category {
        Category::SpeedQuestions => CategoryRule {
            correct: fx.turn(TurnChange::Give(Side::Left)),
            wrong: fx.turn(TurnChange::Give(Side::Right)),
            uses_turn: true,
            ..base
        },
        Category::QuickQuestions => CategoryRule {
            default_duration: Some(k.quick_duration),
            correct: fx.award(k.quick_points).advance().cue(Cue::Correct),
            wrong: fx.advance().cue(Cue::Wrong),
            digits: DigitEffect::AdvanceSet(1),
            advance: AdvancePolicy::LinearWithTerminalBonus {
                bonus: k.quick_terminal_bonus,
            },
            uses_turn: true,
            ..base
        },
        Category::Puzzles | Category::Windows => CategoryRule {
            default_duration: Some(if category == Category::Puzzles {
                k.puzzle_duration
            } else {
                k.window_duration
            }),
            correct: fx.pause().reveal(Reveal::Toggle).cue(Cue::Correct),
            wrong: fx.pause().cue(Cue::Wrong),
            extra: ExtraEffect::Rate,
            tracks_done: true,
            auto_done_on_enter: true,
            ..base
        },
        Category::Debate => CategoryRule {
            default_duration: Some(k.debate_durations[0]),
            correct: fx.pause().reveal(Reveal::Toggle),
            wrong: fx.pause().reveal(Reveal::Toggle),
            extra: ExtraEffect::Rate,
            digits: DigitEffect::Durations(k.debate_durations.to_vec()),
            ..base
        },
        Category::PoeticChase => CategoryRule {
            default_duration: Some(k.chase_duration),
            correct: fx
                .award(k.chase_bonus)
                .turn(TurnChange::Flip)
                .reset_to(k.chase_duration)
                .reveal(Reveal::Pulse)
                .cue(Cue::Correct),
            wrong: fx
                .award(-k.chase_penalty)
                .capped(k.chase_penalty_cap)
                .turn(TurnChange::Flip)
                .reset_to(k.chase_duration)
                .reveal(Reveal::Pulse)
                .cue(Cue::Wrong),
            advance: AdvancePolicy::TurnAlternating,
            uses_turn: true,
            ..base
        },
        Category::AskSmartly => CategoryRule {
            default_duration: Some(k.ask_duration),
            correct: fx
                .turn(TurnChange::Flip)
                .reset_to(k.ask_duration)
                .reveal(Reveal::Pulse)
                .cue(Cue::Correct),
            wrong: fx
                .award(-k.ask_penalty)
                .against(ScoreTarget::Opponent)
                .cue(Cue::Wrong),
            extra: ExtraEffect::Award(k.ask_bonus),
            advance: AdvancePolicy::TurnAlternating,
            uses_turn: true,
            ..base
        },
        Category::AudienceQuestions => CategoryRule {
            advance: AdvancePolicy::Cyclic,
            ..base
        },
    }
}
