use std::fs;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use showrunner::app::App;
use showrunner::config::Config;
use showrunner::keys::handle_key;
use showrunner::nav::{PickerTarget, Screen};
use showrunner::show::category::{Category, Side, WindowTopic};
use showrunner::show::cue::{Cue, CueCall, RecordingCuePlayer};
use showrunner::show::dataset::{QuestionDataset, QuestionRef};
use showrunner::show::timer::TimerState;

const SHOW: &str = r#"{
    "leftTeamName": "Owls",
    "rightTeamName": "Foxes",
    "parts": {
        "speedQuestions": [ { "text": "speed" } ],
        "quickQuestions": [
            [ { "text": "q1" }, { "text": "q2" }, { "text": "q3" }, { "text": "q4" } ],
            [ { "text": "r1" }, { "text": "r2" } ]
        ],
        "puzzles": [
            { "text": "riddle one", "answer": "piano", "duration": 30 },
            { "text": "riddle two" }
        ],
        "windows": {
            "arts": [ { "text": "painter" }, { "text": "composer" } ]
        },
        "debate": [ { "text": "motion" } ],
        "poeticChase": [ { "text": "chase" } ],
        "askSmartly": [ { "text": "mystery" } ],
        "audienceQuestions": [ { "text": "a1" }, { "text": "a2" }, { "text": "a3" } ]
    }
}"#;

fn app() -> (App, RecordingCuePlayer) {
    let dataset = QuestionDataset::from_json(SHOW).unwrap();
    let cues = RecordingCuePlayer::default();
    let app = App::new(Config::default(), dataset, Box::new(cues.clone()));
    (app, cues)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(app: &mut App, keys: &str) {
    for ch in keys.chars() {
        handle_key(app, key(KeyCode::Char(ch)));
    }
}

fn scores(app: &App) -> (i32, i32) {
    (app.session.score(Side::Left), app.session.score(Side::Right))
}

#[test]
fn single_press_arms_double_press_navigates() {
    let (mut app, _) = app();
    press(&mut app, "3");
    assert_eq!(app.screen(), Screen::Home);
    assert_eq!(app.selector.highlighted(), Some(3));

    press(&mut app, "4");
    assert_eq!(app.screen(), Screen::Home);
    press(&mut app, "4");
    assert_eq!(
        app.screen(),
        Screen::Picker(PickerTarget::Category(Category::Debate))
    );
    assert_eq!(app.selector.highlighted(), None);
}

#[test]
fn zero_and_out_of_range_digits_never_navigate() {
    let (mut app, _) = app();
    press(&mut app, "00");
    assert_eq!(app.screen(), Screen::Home);
    press(&mut app, "99");
    assert_eq!(app.screen(), Screen::Home);

    // Picker with two puzzles only offers 1 and 2.
    press(&mut app, "33");
    press(&mut app, "33");
    assert_eq!(
        app.screen(),
        Screen::Picker(PickerTarget::Category(Category::Puzzles))
    );
}

#[test]
fn puzzle_entry_marks_done_and_escape_releases_tick() {
    let (mut app, cues) = app();
    press(&mut app, "3311");
    let at = QuestionRef::new(Category::Puzzles, 0);
    assert_eq!(app.screen(), Screen::Question(at));
    assert!(app.dataset.is_done(at));

    handle_key(&mut app, key(KeyCode::Enter));
    assert_eq!(
        app.question.as_ref().unwrap().timer().unwrap().state(),
        TimerState::Running
    );
    assert_eq!(cues.transport().last(), Some(&CueCall::Play(Cue::Tick)));

    handle_key(&mut app, key(KeyCode::Esc));
    assert_eq!(
        app.screen(),
        Screen::Picker(PickerTarget::Category(Category::Puzzles))
    );
    assert!(app.question.is_none());
    assert_eq!(cues.transport().last(), Some(&CueCall::Pause(Cue::Tick)));
}

#[test]
fn rating_adds_safe_parsed_sums_and_returns_past_question() {
    let (mut app, _) = app();
    press(&mut app, "3322");
    press(&mut app, "e");
    assert_eq!(app.screen(), Screen::Rate);

    press(&mut app, "10");
    handle_key(&mut app, key(KeyCode::Tab));
    press(&mut app, "5x");
    handle_key(&mut app, key(KeyCode::Tab));
    press(&mut app, "abc");
    handle_key(&mut app, key(KeyCode::Tab));
    press(&mut app, "7");
    handle_key(&mut app, key(KeyCode::Enter));

    assert_eq!(scores(&app), (7, 15));
    assert_eq!(
        app.screen(),
        Screen::Picker(PickerTarget::Category(Category::Puzzles))
    );
}

#[test]
fn countdown_runs_out_through_frame_updates() {
    let (mut app, cues) = app();
    press(&mut app, "3311");
    handle_key(&mut app, key(KeyCode::Enter));
    cues.clear();

    let start = Instant::now();
    app.update(start);
    app.update(start + Duration::from_secs(20));
    let timer = app.question.as_ref().unwrap().timer().unwrap();
    assert_eq!(timer.remaining_secs(), 10);
    assert!(cues.calls().iter().any(|c| matches!(c, CueCall::Rate(Cue::Tick, _))));

    app.update(start + Duration::from_secs(31));
    let timer = app.question.as_ref().unwrap().timer().unwrap();
    assert_eq!(timer.state(), TimerState::Complete);
    assert_eq!(cues.transport().last(), Some(&CueCall::Play(Cue::TimesUp)));
}

#[test]
fn quick_questions_walk_and_advance_set() {
    let (mut app, _) = app();
    press(&mut app, "22");
    assert_eq!(
        app.screen(),
        Screen::Question(QuestionRef::new(Category::QuickQuestions, 0))
    );
    press(&mut app, "zzzz");
    assert_eq!(scores(&app), (5, 0));

    press(&mut app, "1");
    let screen = app.question.as_ref().unwrap();
    assert_eq!(screen.at(), QuestionRef::new(Category::QuickQuestions, 1).with_sub(0));
    assert_eq!(app.session.turn_holder(), Side::Right);

    // Leaving and re-entering opens the set the progress cursor points at.
    handle_key(&mut app, key(KeyCode::Esc));
    press(&mut app, "22");
    assert_eq!(
        app.question.as_ref().unwrap().at(),
        QuestionRef::new(Category::QuickQuestions, 1).with_sub(0)
    );
}

#[test]
fn quick_set_is_not_scored_twice_after_reentry() {
    let (mut app, _) = app();
    press(&mut app, "22zzzz");
    assert_eq!(scores(&app), (5, 0));

    handle_key(&mut app, key(KeyCode::Esc));
    assert_eq!(app.screen(), Screen::Home);
    press(&mut app, "22");
    let screen = app.question.as_ref().unwrap();
    assert_eq!(screen.at(), QuestionRef::new(Category::QuickQuestions, 0).with_sub(3));
    assert!(screen.terminal_bonus_granted());

    press(&mut app, "zzzz");
    assert_eq!(scores(&app), (5, 0));
}

#[test]
fn quick_set_resumes_mid_walk() {
    let (mut app, _) = app();
    press(&mut app, "22zx");
    handle_key(&mut app, key(KeyCode::Esc));
    press(&mut app, "22");
    assert_eq!(app.question.as_ref().unwrap().cursor(), 2);
    // +1 before leaving, then +1 and the terminal +2.
    press(&mut app, "zz");
    assert_eq!(scores(&app), (4, 0));
}

#[test]
fn audience_questions_cycle_and_wrap() {
    let (mut app, _) = app();
    let mut seen = Vec::new();
    for _ in 0..4 {
        press(&mut app, "77");
        seen.push(app.question.as_ref().unwrap().at().index);
        handle_key(&mut app, key(KeyCode::Esc));
    }
    assert_eq!(seen, vec![0, 1, 2, 0]);
}

#[test]
fn window_topic_route_reaches_topic_question() {
    let (mut app, _) = app();
    press(&mut app, "11");
    assert_eq!(app.screen(), Screen::WindowTopics);
    press(&mut app, "44");
    assert_eq!(
        app.screen(),
        Screen::Picker(PickerTarget::Window(WindowTopic::Arts))
    );
    press(&mut app, "22");
    let at = QuestionRef::new(Category::Windows, WindowTopic::Arts.index()).with_sub(1);
    assert_eq!(app.screen(), Screen::Question(at));
    assert!(app.dataset.is_done(at));
    assert_eq!(app.screen().to_string(), "/question/windows/arts/1");
}

#[test]
fn score_editor_sets_scores_from_text() {
    let (mut app, _) = app();
    press(&mut app, "s");
    assert_eq!(app.screen(), Screen::ScoreEditor);

    let clear = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
    handle_key(&mut app, clear);
    press(&mut app, "42");
    handle_key(&mut app, key(KeyCode::Down));
    handle_key(&mut app, clear);
    press(&mut app, "-3pts");
    handle_key(&mut app, key(KeyCode::Enter));

    assert_eq!(scores(&app), (-3, 42));
    assert_eq!(app.screen(), Screen::Home);
}

#[test]
fn global_toggles_work_on_any_screen() {
    let (mut app, _) = app();
    press(&mut app, "66");
    handle_key(&mut app, key(KeyCode::F(8)));
    assert!(app.session.turn_changed());
    handle_key(&mut app, key(KeyCode::PageUp));
    assert!(app.hints_hidden);
    handle_key(&mut app, key(KeyCode::F(8)));
    assert!(!app.session.turn_changed());
}

#[test]
fn ctrl_c_quits_from_question_screen() {
    let (mut app, _) = app();
    press(&mut app, "55");
    press(&mut app, "11");
    assert!(matches!(app.screen(), Screen::Question(_)));
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);
}

#[test]
fn dropping_app_silences_running_tick() {
    let (mut app, cues) = app();
    press(&mut app, "4411");
    handle_key(&mut app, key(KeyCode::Enter));
    drop(app);
    assert_eq!(cues.transport().last(), Some(&CueCall::Pause(Cue::Tick)));
}

#[test]
fn dataset_file_on_disk_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("show.json");
    fs::write(&path, SHOW).unwrap();
    let dataset = QuestionDataset::load(&path).unwrap();
    assert_eq!(dataset.team_name(Side::Right), "Foxes");
    assert_eq!(dataset.len(Category::AudienceQuestions), 3);
}
