use std::time::Duration;

use tracing::debug;

use crate::show::cue::{Cue, CuePlayer};

/// Tick-loop playback rate away from the end of the countdown.
pub const BASELINE_RATE: f32 = 0.75;
/// Length of the closing urgency ramp, in seconds.
pub const URGENCY_WINDOW_SECS: f64 = 15.0;
/// The tick clip restarts from its beginning when the countdown crosses this
/// mark, giving a second audible urgency pulse.
pub const CUE_RESTART_SECS: f64 = 14.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CueParams {
    pub rate: f32,
    pub volume: f32,
}

/// Tick-loop rate and volume for a countdown at `remaining` of `duration`.
///
/// Outside the final window the rate sits at [`BASELINE_RATE`] and the volume
/// grows with elapsed time, `max_volume * (duration - remaining) / duration`.
/// Inside it the rate follows `2 - (remaining + duration - 15) / duration` and
/// the volume ramps linearly from 0 at the window start to `max_volume` at zero.
pub fn cue_curve(remaining: f64, duration: u32, max_volume: f32) -> CueParams {
    let duration = f64::from(duration.max(1));
    let remaining = remaining.max(0.0);
    if remaining > URGENCY_WINDOW_SECS {
        let elapsed = ((duration - remaining) / duration).clamp(0.0, 1.0);
        return CueParams {
            rate: BASELINE_RATE,
            volume: elapsed as f32 * max_volume,
        };
    }
    let rate = 2.0 - (remaining + duration - URGENCY_WINDOW_SECS) / duration;
    let ramp = (URGENCY_WINDOW_SECS - remaining) / URGENCY_WINDOW_SECS;
    CueParams {
        rate: rate as f32,
        volume: (ramp as f32 * max_volume).clamp(0.0, max_volume),
    }
}

/// One step of a running countdown, handed to the cue player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerTick {
    pub remaining: f64,
    pub duration: u32,
    pub restart_cue: bool,
    pub finished: bool,
}

impl TimerTick {
    pub fn cue_params(&self, max_volume: f32) -> CueParams {
        cue_curve(self.remaining, self.duration, max_volume)
    }

    pub fn apply(&self, cues: &mut dyn CuePlayer, max_volume: f32) {
        if self.finished {
            cues.pause(Cue::Tick);
            cues.play(Cue::TimesUp);
            return;
        }
        let params = self.cue_params(max_volume);
        cues.set_rate(Cue::Tick, params.rate);
        cues.set_volume(Cue::Tick, params.volume);
        if self.restart_cue {
            cues.seek(Cue::Tick, 0.0);
        }
    }
}

/// Countdown state machine. Reset, never destroyed, between questions.
#[derive(Clone, Debug)]
pub struct Countdown {
    state: TimerState,
    duration: u32,
    remaining: f64,
}

impl Countdown {
    pub fn new(duration: u32) -> Self {
        Self {
            state: TimerState::Idle,
            duration,
            remaining: f64::from(duration),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Whole seconds left, rounded up the way a countdown display reads.
    pub fn remaining_secs(&self) -> u32 {
        self.remaining.ceil() as u32
    }

    /// Fraction of the duration still left, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.remaining / f64::from(self.duration)).clamp(0.0, 1.0)
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn start(&mut self, duration: u32) {
        self.duration = duration;
        self.remaining = f64::from(duration);
        self.set_state(TimerState::Running);
    }

    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.set_state(TimerState::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != TimerState::Paused {
            return false;
        }
        self.set_state(TimerState::Running);
        true
    }

    pub fn complete(&mut self) {
        self.remaining = 0.0;
        self.set_state(TimerState::Complete);
    }

    /// Back to Idle with a fresh duration.
    pub fn reset(&mut self, duration: u32) {
        self.duration = duration;
        self.remaining = f64::from(duration);
        self.set_state(TimerState::Idle);
    }

    /// Enter-key semantics: start, pause, resume, or restart after completion.
    pub fn toggle(&mut self) -> TimerState {
        match self.state {
            TimerState::Idle | TimerState::Complete => self.start(self.duration),
            TimerState::Running => {
                self.pause();
            }
            TimerState::Paused => {
                self.resume();
            }
        }
        self.state
    }

    /// Move a running countdown forward by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> Option<TimerTick> {
        if self.state != TimerState::Running {
            return None;
        }
        let before = self.remaining;
        self.remaining = (self.remaining - elapsed.as_secs_f64()).max(0.0);
        let finished = self.remaining <= 0.0;
        if finished {
            self.complete();
        }
        Some(TimerTick {
            remaining: self.remaining,
            duration: self.duration,
            restart_cue: !finished
                && before > CUE_RESTART_SECS
                && self.remaining <= CUE_RESTART_SECS,
            finished,
        })
    }

    fn set_state(&mut self, state: TimerState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, remaining = self.remaining, "countdown");
        }
        self.state = state;
    }
}
