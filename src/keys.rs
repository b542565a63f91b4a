use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::nav::Screen;
use crate::show::router::ShowKey;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::F(8) => app.toggle_turn_indicator(),
        KeyCode::PageUp => app.toggle_hints(),
        _ => match app.screen() {
            Screen::Home => handle_home_key(app, key),
            Screen::WindowTopics | Screen::Picker(_) => handle_menu_key(app, key),
            Screen::Question(_) => handle_question_key(app, key),
            Screen::Rate => {
                let action = app.rate_form.inputs.handle(key);
                app.rate_action(action);
            }
            Screen::ScoreEditor => {
                let action = app.score_form.inputs.handle(key);
                app.score_action(action);
            }
        },
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('s') => app.go_to(Screen::ScoreEditor),
        KeyCode::Char(ch) => {
            if let Some(digit) = digit(ch) {
                app.press_digit(digit);
            }
        }
        _ => {}
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_back(1),
        KeyCode::Char(ch) => {
            if let Some(digit) = digit(ch) {
                app.press_digit(digit);
            }
        }
        _ => {}
    }
}

fn handle_question_key(app: &mut App, key: KeyEvent) {
    if let Some(show_key) = show_key(key.code) {
        app.question_key(show_key);
    }
    // Escape also leaves the screen after the category saw it.
    if key.code == KeyCode::Esc {
        app.go_back(1);
    }
}

/// Question-screen binding of terminal keys.
pub fn show_key(code: KeyCode) -> Option<ShowKey> {
    match code {
        KeyCode::Enter => Some(ShowKey::Enter),
        KeyCode::Esc => Some(ShowKey::Escape),
        KeyCode::Char('z' | 'Z') => Some(ShowKey::Correct),
        KeyCode::Char('x' | 'X') => Some(ShowKey::Wrong),
        KeyCode::Char('e') => Some(ShowKey::Extra),
        KeyCode::Char('m') => Some(ShowKey::MarkDone),
        KeyCode::Char('f') => Some(ShowKey::Media),
        KeyCode::Char(ch) => digit(ch).map(ShowKey::Digit),
        _ => None,
    }
}

fn digit(ch: char) -> Option<u8> {
    ch.to_digit(10).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_letter_cases_mark() {
        assert_eq!(show_key(KeyCode::Char('Z')), Some(ShowKey::Correct));
        assert_eq!(show_key(KeyCode::Char('x')), Some(ShowKey::Wrong));
        assert_eq!(show_key(KeyCode::Char('E')), None);
    }

    #[test]
    fn digits_map_to_digit_keys() {
        assert_eq!(show_key(KeyCode::Char('0')), Some(ShowKey::Digit(0)));
        assert_eq!(show_key(KeyCode::Char('9')), Some(ShowKey::Digit(9)));
        assert_eq!(show_key(KeyCode::Tab), None);
    }
}
