use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen split shared by every route: scoreboard on top, content, and the
/// operator hint footer (zero height when hints are hidden).
pub struct ShowLayout {
    pub scoreboard: Rect,
    pub main: Rect,
    pub footer: Rect,
}

impl ShowLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(footer_lines),
            ])
            .split(area);

        Self {
            scoreboard: vertical[0],
            main: vertical[1],
            footer: vertical[2],
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_wrap_at_width() {
        let lines = pack_hint_lines(&["[z] Correct", "[x] Wrong", "[Enter] Timer"], 26);
        assert_eq!(lines, vec!["  [z] Correct  [x] Wrong", "  [Enter] Timer"]);
    }

    #[test]
    fn hints_empty_for_zero_width() {
        assert!(pack_hint_lines(&["[q] Quit"], 0).is_empty());
    }

    #[test]
    fn centered_rect_stays_inside_small_area() {
        let area = Rect::new(0, 0, 30, 10);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn hidden_footer_gives_space_to_main() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = ShowLayout::new(area, 0);
        assert_eq!(layout.footer.height, 0);
        assert_eq!(layout.main.height, 21);
    }
}
