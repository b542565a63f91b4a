use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::show::timer::{Countdown, TimerState};
use crate::ui::theme::Theme;

/// Seconds before zero at which the gauge turns to its final colour.
const FINAL_STRETCH_SECS: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GaugeStage {
    Calm,
    Hurry,
    Final,
}

/// Green for the first half, yellow past half time, red in the last seconds.
pub fn gauge_stage(remaining: f64, duration: u32) -> GaugeStage {
    if remaining <= FINAL_STRETCH_SECS {
        GaugeStage::Final
    } else if remaining <= f64::from(duration) / 2.0 {
        GaugeStage::Hurry
    } else {
        GaugeStage::Calm
    }
}

pub struct CountdownGauge<'a> {
    countdown: &'a Countdown,
    /// Set for the single frame after a forced reset; draws the bar inverted.
    pulse: bool,
    theme: &'a Theme,
}

impl<'a> CountdownGauge<'a> {
    pub fn new(countdown: &'a Countdown, pulse: bool, theme: &'a Theme) -> Self {
        Self {
            countdown,
            pulse,
            theme,
        }
    }

    fn fill_color(&self) -> Color {
        let colors = &self.theme.colors;
        match gauge_stage(self.countdown.remaining(), self.countdown.duration()) {
            GaugeStage::Calm => colors.success(),
            GaugeStage::Hurry => colors.warning(),
            GaugeStage::Final => colors.error(),
        }
    }
}

impl Widget for CountdownGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let status = match self.countdown.state() {
            TimerState::Idle => "ready",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Complete => "time's up",
        };
        let block = Block::bordered()
            .title(format!(" {}s | {status} ", self.countdown.duration()))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let ratio = self.countdown.ratio();
        let filled_width = (ratio * inner.width as f64) as u16;
        let label = format!("{}", self.countdown.remaining_secs());
        let fill = self.fill_color();

        for x in inner.x..inner.x + inner.width {
            let filled = x < inner.x + filled_width;
            let style = match (filled, self.pulse) {
                (true, false) | (false, true) => Style::default().fg(colors.bg()).bg(fill),
                (false, false) | (true, true) => Style::default().fg(colors.fg()).bg(colors.bar_empty()),
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(
            label_x,
            inner.y,
            &label,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_stops_follow_half_time_and_final_seconds() {
        assert_eq!(gauge_stage(60.0, 60), GaugeStage::Calm);
        assert_eq!(gauge_stage(30.5, 60), GaugeStage::Calm);
        assert_eq!(gauge_stage(30.0, 60), GaugeStage::Hurry);
        assert_eq!(gauge_stage(5.5, 60), GaugeStage::Hurry);
        assert_eq!(gauge_stage(5.0, 60), GaugeStage::Final);
    }

    #[test]
    fn short_countdowns_skip_straight_to_final() {
        assert_eq!(gauge_stage(4.0, 8), GaugeStage::Final);
        assert_eq!(gauge_stage(0.0, 0), GaugeStage::Final);
    }
}
