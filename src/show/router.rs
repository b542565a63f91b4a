use std::borrow::Cow;
use std::time::Duration;

use tracing::{debug, info};

use crate::show::category::{Category, Shape};
use crate::show::cue::{Cue, CuePlayer};
use crate::show::dataset::{Question, QuestionDataset, QuestionRef};
use crate::show::rules::{
    AdvancePolicy, CategoryRule, CategoryRuleTable, DigitEffect, ExtraEffect, KeyEffect, Reveal,
    ScoreTarget, TurnChange,
};
use crate::show::session::{SessionStore, SetWalk};
use crate::show::timer::{Countdown, TimerState};

/// The question-screen keyboard alphabet, independent of the terminal backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowKey {
    Enter,
    Escape,
    Correct,
    Wrong,
    Digit(u8),
    Extra,
    MarkDone,
    Media,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Wrong,
}

/// A key press resolved against the active category's rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleTimer,
    StopTickCue,
    Mark(Verdict),
    SetDuration(u32),
    AdvanceSet,
    OpenRating,
    Award(i32),
    ToggleDone,
    ToggleMedia,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
    /// The caller should navigate to the rating screen.
    OpenRating,
}

/// Mutable collaborators a command may touch.
pub struct ShowContext<'a> {
    pub session: &'a mut SessionStore,
    pub dataset: &'a mut QuestionDataset,
    pub cues: &'a mut dyn CuePlayer,
}

/// Per-mount state of a question screen. Created on entry, released on every
/// exit path.
#[derive(Clone, Debug)]
pub struct QuestionScreen {
    at: QuestionRef,
    timer: Option<Countdown>,
    pub reveal: bool,
    pub pulse: bool,
    pub media_shown: bool,
    terminal_bonus_granted: bool,
    penalties: [u32; 2],
    auto_marked: bool,
}

impl QuestionScreen {
    fn new(at: QuestionRef, timer: Option<Countdown>) -> Self {
        Self {
            at,
            timer,
            reveal: false,
            pulse: false,
            media_shown: false,
            terminal_bonus_granted: false,
            penalties: [0; 2],
            auto_marked: false,
        }
    }

    /// Address of the question on display (sub carries the quick-question cursor).
    pub fn at(&self) -> QuestionRef {
        self.at
    }

    pub fn category(&self) -> Category {
        self.at.category
    }

    pub fn cursor(&self) -> usize {
        self.at.sub.unwrap_or(0)
    }

    pub fn timer(&self) -> Option<&Countdown> {
        self.timer.as_ref()
    }

    pub fn terminal_bonus_granted(&self) -> bool {
        self.terminal_bonus_granted
    }

    pub fn question<'d>(&self, dataset: &'d QuestionDataset) -> Cow<'d, Question> {
        dataset.resolve(self.at)
    }

    /// Automatic done toggle on entry; fires at most once per mount.
    fn mark_on_mount(&mut self, dataset: &mut QuestionDataset) {
        if self.auto_marked {
            return;
        }
        self.auto_marked = true;
        dataset.toggle_done(self.at);
    }

    /// One frame: drop the reveal pulse and move the countdown.
    pub fn tick(&mut self, elapsed: Duration, cues: &mut dyn CuePlayer, max_volume: f32) {
        self.pulse = false;
        let Some(timer) = self.timer.as_mut() else {
            return;
        };
        if let Some(tick) = timer.advance(elapsed) {
            tick.apply(cues, max_volume);
            if tick.finished {
                info!(category = self.at.category.as_str(), "time's up");
            }
        }
    }

    /// Detach from the tick source: silence the loop and park the countdown.
    pub fn release(&mut self, cues: &mut dyn CuePlayer) {
        if let Some(timer) = self.timer.as_mut() {
            timer.pause();
            cues.pause(Cue::Tick);
        }
    }

    fn pause_timer(&mut self, cues: &mut dyn CuePlayer) {
        if let Some(timer) = self.timer.as_mut() {
            if timer.pause() {
                cues.pause(Cue::Tick);
            }
        }
    }

    fn reset_timer(&mut self, seconds: u32, cues: &mut dyn CuePlayer) {
        if let Some(timer) = self.timer.as_mut() {
            timer.reset(seconds);
            cues.pause(Cue::Tick);
        }
    }
}

/// Turns question-screen keys into mutations of the session, the dataset, the
/// countdown and the cue player, according to the rule table.
#[derive(Clone, Debug, Default)]
pub struct CommandRouter {
    rules: CategoryRuleTable,
}

impl CommandRouter {
    pub fn new(rules: CategoryRuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CategoryRuleTable {
        &self.rules
    }

    pub fn rule(&self, category: Category) -> &CategoryRule {
        self.rules.get(category)
    }

    /// Build the screen state for `at`, applying the automatic done toggle
    /// when the category asks for it. A walked set resumes where the session
    /// left it.
    pub fn mount(
        &self,
        at: QuestionRef,
        dataset: &mut QuestionDataset,
        session: &SessionStore,
        auto_mark_done: bool,
    ) -> QuestionScreen {
        let rule = self.rules.get(at.category);
        let mut at = match (at.category.shape(), at.sub) {
            (Shape::Grouped, None) => at.with_sub(0),
            _ => at,
        };
        let mut walk = SetWalk::default();
        if matches!(rule.advance, AdvancePolicy::LinearWithTerminalBonus { .. }) {
            walk = session.set_walk(at.category, at.index);
            let last = dataset.group_len(at.category, at.index).saturating_sub(1);
            at.sub = Some(walk.cursor.min(last));
        }
        let timer = rule.duration_for(&dataset.resolve(at)).map(Countdown::new);
        let mut screen = QuestionScreen::new(at, timer);
        screen.terminal_bonus_granted = walk.bonus_granted;
        if auto_mark_done && rule.auto_done_on_enter {
            screen.mark_on_mount(dataset);
        }
        debug!(category = at.category.as_str(), index = at.index, sub = ?at.sub, "question mounted");
        screen
    }

    /// Pure lookup: what `key` means for `category`, if anything.
    pub fn resolve(&self, category: Category, key: ShowKey) -> Option<Command> {
        let rule = self.rules.get(category);
        match key {
            ShowKey::Enter => rule.is_timed().then_some(Command::ToggleTimer),
            ShowKey::Escape => rule.is_timed().then_some(Command::StopTickCue),
            ShowKey::Correct => (!rule.correct.is_noop()).then_some(Command::Mark(Verdict::Correct)),
            ShowKey::Wrong => (!rule.wrong.is_noop()).then_some(Command::Mark(Verdict::Wrong)),
            ShowKey::Digit(d) => match &rule.digits {
                DigitEffect::None => None,
                DigitEffect::Durations(choices) => d
                    .checked_sub(1)
                    .and_then(|i| choices.get(usize::from(i)))
                    .map(|&seconds| Command::SetDuration(seconds)),
                DigitEffect::AdvanceSet(key) => (*key == d).then_some(Command::AdvanceSet),
            },
            ShowKey::Extra => match rule.extra {
                ExtraEffect::None => None,
                ExtraEffect::Rate => Some(Command::OpenRating),
                ExtraEffect::Award(points) => Some(Command::Award(points)),
            },
            ShowKey::MarkDone => rule.tracks_done.then_some(Command::ToggleDone),
            ShowKey::Media => Some(Command::ToggleMedia),
        }
    }

    pub fn dispatch(
        &self,
        key: ShowKey,
        screen: &mut QuestionScreen,
        ctx: &mut ShowContext<'_>,
    ) -> Outcome {
        match self.resolve(screen.category(), key) {
            Some(command) => self.apply(command, screen, ctx),
            None => {
                debug!(?key, category = screen.category().as_str(), "key ignored");
                Outcome::Ignored
            }
        }
    }

    pub fn apply(
        &self,
        command: Command,
        screen: &mut QuestionScreen,
        ctx: &mut ShowContext<'_>,
    ) -> Outcome {
        let rule = self.rules.get(screen.category());
        match command {
            Command::ToggleTimer => {
                let Some(timer) = screen.timer.as_mut() else {
                    return Outcome::Ignored;
                };
                match timer.toggle() {
                    TimerState::Running => ctx.cues.play(Cue::Tick),
                    _ => ctx.cues.pause(Cue::Tick),
                }
            }
            Command::StopTickCue => ctx.cues.pause(Cue::Tick),
            Command::Mark(verdict) => {
                let effect = match verdict {
                    Verdict::Correct => rule.correct,
                    Verdict::Wrong => rule.wrong,
                };
                match rule.advance {
                    AdvancePolicy::LinearWithTerminalBonus { bonus } => {
                        mark_linear(&effect, verdict, bonus, screen, ctx)
                    }
                    _ => apply_effect(&effect, screen, ctx),
                }
            }
            Command::SetDuration(seconds) => {
                screen.reset_timer(seconds, ctx.cues);
                screen.pulse = true;
            }
            Command::AdvanceSet => self.advance_set(screen, ctx),
            Command::OpenRating => return Outcome::OpenRating,
            Command::Award(points) => {
                let holder = ctx.session.turn_holder();
                ctx.session.adjust_score(holder, points);
                ctx.cues.play(Cue::Correct);
            }
            Command::ToggleDone => {
                ctx.dataset.toggle_done(screen.at);
            }
            Command::ToggleMedia => screen.media_shown = !screen.media_shown,
        }
        Outcome::Applied
    }

    /// Next quick-question set: cursor, bonus flag and countdown start over
    /// and the other side takes the turn.
    fn advance_set(&self, screen: &mut QuestionScreen, ctx: &mut ShowContext<'_>) {
        let category = screen.category();
        let sets = ctx.dataset.len(category);
        let next = ctx.session.advance_progress(category, sets);
        ctx.session.restart_walk(category, next);
        ctx.session.toggle_turn();

        screen.at = QuestionRef::new(category, next).with_sub(0);
        screen.terminal_bonus_granted = false;
        screen.reveal = false;
        screen.pulse = true;
        if let Some(seconds) = self
            .rules
            .get(category)
            .duration_for(&ctx.dataset.resolve(screen.at))
        {
            screen.reset_timer(seconds, ctx.cues);
        }
        info!(category = category.as_str(), set = next, "advanced to next set");
    }
}

fn apply_effect(effect: &KeyEffect, screen: &mut QuestionScreen, ctx: &mut ShowContext<'_>) {
    if effect.points != 0 {
        let holder = ctx.session.turn_holder();
        let side = match effect.target {
            ScoreTarget::Holder => holder,
            ScoreTarget::Opponent => holder.other(),
        };
        let within_cap = match effect.penalty_cap {
            Some(cap) if effect.points < 0 => {
                let taken = &mut screen.penalties[side.slot()];
                if *taken < cap {
                    *taken += 1;
                    true
                } else {
                    false
                }
            }
            _ => true,
        };
        if within_cap {
            ctx.session.adjust_score(side, effect.points);
        } else {
            debug!(side = side.as_str(), "penalty cap reached");
        }
    }

    match effect.turn {
        TurnChange::Keep => {}
        TurnChange::Flip => ctx.session.toggle_turn(),
        TurnChange::Give(side) => ctx.session.set_turn(side),
    }

    if let Some(seconds) = effect.reset_duration {
        screen.reset_timer(seconds, ctx.cues);
    } else if effect.pause_timer {
        screen.pause_timer(ctx.cues);
    }

    match effect.reveal {
        Reveal::Keep => {}
        Reveal::Toggle => screen.reveal = !screen.reveal,
        Reveal::Pulse => screen.pulse = true,
    }

    if let Some(cue) = effect.cue {
        ctx.cues.play(cue);
    }
}

/// Quick-question walk. Below the last sub-question a press scores (for a
/// correct answer) and moves on; at the last one the countdown pauses and the
/// first correct answer pays points plus the one-shot bonus.
fn mark_linear(
    effect: &KeyEffect,
    verdict: Verdict,
    bonus: i32,
    screen: &mut QuestionScreen,
    ctx: &mut ShowContext<'_>,
) {
    let terminal = ctx
        .dataset
        .group_len(screen.category(), screen.at.index)
        .saturating_sub(1);
    let cursor = screen.cursor();
    let holder = ctx.session.turn_holder();

    if cursor < terminal && effect.advance {
        ctx.session.adjust_score(holder, effect.points);
        screen.at.sub = Some(cursor + 1);
        if let Some(cue) = effect.cue {
            ctx.cues.play(cue);
        }
    } else {
        if !screen.terminal_bonus_granted {
            if verdict == Verdict::Correct {
                ctx.session.adjust_score(holder, effect.points + bonus);
                screen.terminal_bonus_granted = true;
            }
            if let Some(cue) = effect.cue {
                ctx.cues.play(cue);
            }
        }
        screen.pause_timer(ctx.cues);
    }

    ctx.session.record_walk(
        screen.category(),
        screen.at.index,
        SetWalk {
            cursor: screen.cursor(),
            bonus_granted: screen.terminal_bonus_granted,
        },
    );
}
