use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// The short audio clips the show uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Tick,
    TimesUp,
    Correct,
    Wrong,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Tick, Cue::TimesUp, Cue::Correct, Cue::Wrong];

    /// File stem looked up in the cue directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            Cue::Tick => "tick",
            Cue::TimesUp => "times_up",
            Cue::Correct => "correct",
            Cue::Wrong => "wrong",
        }
    }

    /// The tick clip loops for as long as a countdown runs.
    pub fn loops(self) -> bool {
        matches!(self, Cue::Tick)
    }
}

/// Audio playback seam. Implementations never fail loudly: a missing device or
/// clip is logged and the show goes on.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
    fn pause(&mut self, cue: Cue);
    fn set_rate(&mut self, cue: Cue, rate: f32);
    fn set_volume(&mut self, cue: Cue, volume: f32);
    fn seek(&mut self, cue: Cue, seconds: f32);
}

/// Used when no audio backend is compiled in.
#[derive(Debug, Default)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play(&mut self, cue: Cue) {
        trace!(?cue, "play");
    }

    fn pause(&mut self, cue: Cue) {
        trace!(?cue, "pause");
    }

    fn set_rate(&mut self, cue: Cue, rate: f32) {
        trace!(?cue, rate, "set rate");
    }

    fn set_volume(&mut self, cue: Cue, volume: f32) {
        trace!(?cue, volume, "set volume");
    }

    fn seek(&mut self, cue: Cue, seconds: f32) {
        trace!(?cue, seconds, "seek");
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CueCall {
    Play(Cue),
    Pause(Cue),
    Rate(Cue, f32),
    Volume(Cue, f32),
    Seek(Cue, f32),
}

/// Records every call; clones share the same log so a test can keep a handle
/// after boxing the player into the app.
#[derive(Clone, Debug, Default)]
pub struct RecordingCuePlayer {
    calls: Rc<RefCell<Vec<CueCall>>>,
}

impl RecordingCuePlayer {
    pub fn calls(&self) -> Vec<CueCall> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Play/pause/seek calls only, skipping the per-frame rate and volume noise.
    pub fn transport(&self) -> Vec<CueCall> {
        self.calls
            .borrow()
            .iter()
            .copied()
            .filter(|c| !matches!(c, CueCall::Rate(..) | CueCall::Volume(..)))
            .collect()
    }
}

impl CuePlayer for RecordingCuePlayer {
    fn play(&mut self, cue: Cue) {
        self.calls.borrow_mut().push(CueCall::Play(cue));
    }

    fn pause(&mut self, cue: Cue) {
        self.calls.borrow_mut().push(CueCall::Pause(cue));
    }

    fn set_rate(&mut self, cue: Cue, rate: f32) {
        self.calls.borrow_mut().push(CueCall::Rate(cue, rate));
    }

    fn set_volume(&mut self, cue: Cue, volume: f32) {
        self.calls.borrow_mut().push(CueCall::Volume(cue, volume));
    }

    fn seek(&mut self, cue: Cue, seconds: f32) {
        self.calls.borrow_mut().push(CueCall::Seek(cue, seconds));
    }
}
