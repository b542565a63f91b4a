mod app;
#[cfg(feature = "audio")]
mod audio;
mod config;
mod event;
mod forms;
mod keys;
mod nav;
mod show;
mod ui;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::{App, HOME_ENTRIES};
use config::Config;
use event::{AppEvent, EventHandler};
use forms::{RATE_FIELDS, ScoreForm};
use nav::{PickerTarget, Screen};
use show::category::{Category, WindowTopic};
use show::cue::CuePlayer;
use show::dataset::QuestionDataset;
use show::rules::{CategoryRule, DigitEffect, ExtraEffect};
use ui::components::countdown::CountdownGauge;
use ui::components::form_view::FormView;
use ui::components::menu::{Menu, MenuItem};
use ui::components::question_view::QuestionView;
use ui::components::scoreboard::Scoreboard;
use ui::layout::{ShowLayout, pack_hint_lines};

#[derive(Parser)]
#[command(name = "showrunner", version, about = "Operator console for live trivia game shows")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Show dataset (JSON); defaults to the bundled sample show")]
    data: Option<PathBuf>,

    #[arg(short, long, help = "Config file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Log file path")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.unwrap_or_else(Config::default_log_path).as_path());

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }

    let dataset_path = cli
        .data
        .or_else(|| config.dataset_path.as_ref().map(PathBuf::from));
    let dataset = load_dataset(dataset_path.as_deref());
    let cues = cue_player(&config);

    let mut app = App::new(config, dataset, cues);
    info!("show started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(app.config.tick_rate_ms));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    info!(
        left = app.session.session().left_score,
        right = app.session.session().right_score,
        "show ended"
    );

    Ok(())
}

/// Log to a file: the terminal belongs to the UI. A log file that cannot be
/// opened leaves logging off.
fn init_logging(path: &Path) {
    let file = match open_log_file(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("logging disabled: {err:#}");
            return;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create log directory {}", parent.display()))?;
    }
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open {}", path.display()))
}

fn load_dataset(path: Option<&Path>) -> QuestionDataset {
    match path {
        Some(path) => QuestionDataset::load(path).unwrap_or_else(|err| {
            warn!(%err, "falling back to the bundled show");
            QuestionDataset::bundled()
        }),
        None => QuestionDataset::bundled(),
    }
}

#[cfg(feature = "audio")]
fn cue_player(config: &Config) -> Box<dyn CuePlayer> {
    Box::new(audio::RodioCuePlayer::new(Path::new(&config.cue_dir)))
}

#[cfg(not(feature = "audio"))]
fn cue_player(_config: &Config) -> Box<dyn CuePlayer> {
    Box::new(show::cue::SilentCuePlayer)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        app.update(Instant::now());
        match event {
            AppEvent::Key(key) => keys::handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let screen = app.screen();
    let hints = screen_hints(app, screen);
    let hint_lines = if app.hints_hidden {
        Vec::new()
    } else {
        pack_hint_lines(&hints, area.width as usize)
    };
    let layout = ShowLayout::new(area, hint_lines.len() as u16);

    let title = screen_title(screen);
    let scoreboard = Scoreboard::new(app.session.session(), &app.dataset, &title, app.theme);
    frame.render_widget(scoreboard, layout.scoreboard);

    match screen {
        Screen::Home | Screen::WindowTopics | Screen::Picker(_) => render_menu(frame, app, screen, layout.main),
        Screen::Question(_) => render_question(frame, app, layout.main),
        Screen::Rate => render_rate(frame, app, layout.main),
        Screen::ScoreEditor => render_score_editor(frame, app, layout.main),
    }

    let footer: Vec<Line> = hint_lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn screen_title(screen: Screen) -> String {
    match screen {
        Screen::Home => "Showrunner".to_string(),
        Screen::WindowTopics => Category::Windows.label().to_string(),
        Screen::Picker(PickerTarget::Category(category)) => category.label().to_string(),
        Screen::Picker(PickerTarget::Window(topic)) => topic.label().to_string(),
        Screen::Question(at) => at.category.label().to_string(),
        Screen::Rate => "Rating".to_string(),
        Screen::ScoreEditor => "Scores".to_string(),
    }
}

fn screen_hints(app: &App, screen: Screen) -> Vec<&'static str> {
    let mut hints = match screen {
        Screen::Home => vec!["[1-8] twice to open", "[s] Scores", "[q] Quit"],
        Screen::WindowTopics | Screen::Picker(_) => vec!["digit twice to open", "[Esc] Back"],
        Screen::Question(at) => question_hints(app.router.rule(at.category)),
        Screen::Rate | Screen::ScoreEditor => {
            vec!["[Tab/Down] Next", "[Shift-Tab/Up] Prev", "[Enter] Save", "[Esc] Cancel"]
        }
    };
    hints.extend(["[F8] Turn", "[PgUp] Hide hints"]);
    hints
}

fn question_hints(rule: &CategoryRule) -> Vec<&'static str> {
    let mut hints = Vec::new();
    if rule.is_timed() {
        hints.push("[Enter] Start/pause");
    }
    if rule.category == Category::SpeedQuestions {
        hints.extend(["[z] Left answers", "[x] Right answers"]);
    } else {
        if !rule.correct.is_noop() {
            hints.push("[z] Correct");
        }
        if !rule.wrong.is_noop() {
            hints.push("[x] Wrong");
        }
    }
    match rule.digits {
        DigitEffect::None => {}
        DigitEffect::Durations(_) => hints.push("[1/2] Duration"),
        DigitEffect::AdvanceSet(_) => hints.push("[1] Next set"),
    }
    match rule.extra {
        ExtraEffect::None => {}
        ExtraEffect::Rate => hints.push("[e] Rate"),
        ExtraEffect::Award(_) => hints.push("[e] Bonus"),
    }
    if rule.tracks_done {
        hints.push("[m] Done");
    }
    hints.extend(["[f] Media", "[Esc] Back"]);
    hints
}

fn render_menu(frame: &mut ratatui::Frame, app: &App, screen: Screen, area: ratatui::layout::Rect) {
    let armed = app.selector.highlighted();
    let (title, items) = match screen {
        Screen::Home => {
            let items = HOME_ENTRIES
                .iter()
                .enumerate()
                .map(|(i, entry)| MenuItem {
                    key: (i + 1) as u8,
                    label: entry.label().to_string(),
                    done: false,
                })
                .collect();
            ("Choose a round".to_string(), items)
        }
        Screen::WindowTopics => {
            let items = WindowTopic::ALL
                .iter()
                .map(|topic| MenuItem {
                    key: (topic.index() + 1) as u8,
                    label: topic.label().to_string(),
                    done: app.dataset.group_done(Category::Windows, topic.index()),
                })
                .collect();
            ("Choose a topic".to_string(), items)
        }
        Screen::Picker(target) => {
            let count = app.picker_len(target);
            let items = Menu::numbered(count, |i| match target {
                PickerTarget::Category(category) => {
                    app.dataset.is_done(show::dataset::QuestionRef::new(category, i))
                }
                PickerTarget::Window(topic) => app.dataset.is_done(
                    show::dataset::QuestionRef::new(Category::Windows, topic.index()).with_sub(i),
                ),
            });
            (screen_title(screen), items)
        }
        _ => return,
    };

    let menu_area = ui::layout::centered_rect(50, 80, area);
    let menu = Menu::new(&title, items, armed, app.theme);
    frame.render_widget(&menu, menu_area);
}

fn render_question(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(screen) = app.question.as_ref() else {
        return;
    };
    let at = screen.at();
    let question = screen.question(&app.dataset);
    let group_len = app.dataset.group_len(at.category, at.index);

    let constraints = if screen.timer().is_some() {
        vec![Constraint::Min(5), Constraint::Length(3)]
    } else {
        vec![Constraint::Min(5)]
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let view = QuestionView::new(at, &question, group_len, app.theme)
        .reveal(screen.reveal)
        .media_shown(screen.media_shown);
    frame.render_widget(view, rows[0]);

    if let Some(timer) = screen.timer() {
        frame.render_widget(CountdownGauge::new(timer, screen.pulse, app.theme), rows[1]);
    }
}

fn render_rate(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let inputs = &app.rate_form.inputs;
    let rows = RATE_FIELDS
        .iter()
        .zip(inputs.fields.iter())
        .map(|((side, label), input)| {
            (format!("{} {label}", app.dataset.team_name(*side)), input)
        })
        .collect();
    let view = FormView::new("Rate the answer", rows, inputs.focused, app.theme);
    frame.render_widget(view, ui::layout::centered_rect(50, 60, area));
}

fn render_score_editor(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let inputs = &app.score_form.inputs;
    let rows = inputs
        .fields
        .iter()
        .enumerate()
        .map(|(i, input)| (app.dataset.team_name(ScoreForm::side(i)).to_string(), input))
        .collect();
    let view = FormView::new("Set scores", rows, inputs.focused, app.theme);
    frame.render_widget(view, ui::layout::centered_rect(50, 40, area));
}
