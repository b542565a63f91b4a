use std::time::Instant;

use tracing::info;

use crate::config::Config;
use crate::forms::{FormAction, RateForm, ScoreForm};
use crate::nav::{Navigator, PickerTarget, Screen, ScreenStack};
use crate::show::category::{Category, WindowTopic};
use crate::show::cue::CuePlayer;
use crate::show::dataset::{QuestionDataset, QuestionRef};
use crate::show::router::{CommandRouter, Outcome, QuestionScreen, ShowContext, ShowKey};
use crate::show::rules::CategoryRuleTable;
use crate::show::selector::{Selection, Selector};
use crate::show::session::SessionStore;
use crate::ui::theme::Theme;

/// Highest digit a numbered menu can offer.
const MAX_MENU_DIGIT: u8 = 9;

/// Home menu entries, in digit order starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeEntry {
    Windows,
    QuickQuestions,
    Picker(Category),
    AudienceQuestions,
    SpeedQuestions,
}

pub const HOME_ENTRIES: [HomeEntry; 8] = [
    HomeEntry::Windows,
    HomeEntry::QuickQuestions,
    HomeEntry::Picker(Category::Puzzles),
    HomeEntry::Picker(Category::Debate),
    HomeEntry::Picker(Category::PoeticChase),
    HomeEntry::Picker(Category::AskSmartly),
    HomeEntry::AudienceQuestions,
    HomeEntry::SpeedQuestions,
];

impl HomeEntry {
    pub fn label(self) -> &'static str {
        match self {
            HomeEntry::Windows => Category::Windows.label(),
            HomeEntry::QuickQuestions => Category::QuickQuestions.label(),
            HomeEntry::Picker(category) => category.label(),
            HomeEntry::AudienceQuestions => Category::AudienceQuestions.label(),
            HomeEntry::SpeedQuestions => Category::SpeedQuestions.label(),
        }
    }
}

pub struct App {
    pub config: Config,
    pub theme: &'static Theme,
    pub session: SessionStore,
    pub dataset: QuestionDataset,
    pub router: CommandRouter,
    pub nav: ScreenStack,
    pub selector: Selector,
    /// Mounted question screen; `Some` exactly while a question route is current.
    pub question: Option<QuestionScreen>,
    pub rate_form: RateForm,
    pub score_form: ScoreForm,
    pub hints_hidden: bool,
    pub should_quit: bool,
    cues: Box<dyn CuePlayer>,
    last_tick: Option<Instant>,
}

impl App {
    pub fn new(config: Config, dataset: QuestionDataset, cues: Box<dyn CuePlayer>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let router = CommandRouter::new(CategoryRuleTable::new(&config.rules));
        let session = SessionStore::new();
        let score_form = ScoreForm::from_session(&session);

        Self {
            config,
            theme,
            session,
            dataset,
            router,
            nav: ScreenStack::default(),
            selector: Selector::Idle,
            question: None,
            rate_form: RateForm::default(),
            score_form,
            hints_hidden: false,
            should_quit: false,
            cues,
            last_tick: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.nav.current()
    }

    pub fn go_to(&mut self, screen: Screen) {
        self.unmount();
        self.nav.go_to(screen);
        self.mount();
    }

    pub fn go_back(&mut self, steps: usize) {
        self.unmount();
        self.nav.go_back(steps);
        self.mount();
    }

    /// Release everything the current screen holds. Every exit path runs this.
    fn unmount(&mut self) {
        if let Some(mut screen) = self.question.take() {
            screen.release(self.cues.as_mut());
        }
        self.selector.reset();
    }

    fn mount(&mut self) {
        match self.nav.current() {
            Screen::Question(at) => {
                self.question = Some(self.router.mount(
                    at,
                    &mut self.dataset,
                    &self.session,
                    self.config.auto_mark_done_on_enter,
                ));
            }
            Screen::Rate => self.rate_form = RateForm::default(),
            Screen::ScoreEditor => self.score_form = ScoreForm::from_session(&self.session),
            Screen::Home | Screen::WindowTopics | Screen::Picker(_) => {}
        }
    }

    /// Advance frame-driven state (countdown, reveal pulse) to `now`.
    pub fn update(&mut self, now: Instant) {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);
        if let Some(screen) = self.question.as_mut() {
            screen.tick(elapsed, self.cues.as_mut(), self.config.max_volume);
        }
    }

    pub fn toggle_turn_indicator(&mut self) {
        let changed = !self.session.turn_changed();
        self.session.set_turn_changed(changed);
    }

    pub fn toggle_hints(&mut self) {
        self.hints_hidden = !self.hints_hidden;
    }

    /// Highest digit the current menu accepts, or `None` off menu screens.
    pub fn menu_max(&self) -> Option<u8> {
        match self.nav.current() {
            Screen::Home => Some(HOME_ENTRIES.len() as u8),
            Screen::WindowTopics => Some(WindowTopic::ALL.len() as u8),
            Screen::Picker(target) => {
                Some(self.picker_len(target).min(usize::from(MAX_MENU_DIGIT)) as u8)
            }
            _ => None,
        }
    }

    pub fn picker_len(&self, target: PickerTarget) -> usize {
        match target {
            PickerTarget::Category(category) => self.dataset.len(category),
            PickerTarget::Window(topic) => self.dataset.group_len(Category::Windows, topic.index()),
        }
    }

    /// Feed a digit to the menu selector; a confirmed digit opens its entry.
    pub fn press_digit(&mut self, digit: u8) {
        let Some(max) = self.menu_max() else {
            return;
        };
        if let Selection::Confirmed(n) = self.selector.press(digit, max) {
            self.open_entry(usize::from(n) - 1);
        }
    }

    fn open_entry(&mut self, index: usize) {
        match self.nav.current() {
            Screen::Home => {
                if let Some(&entry) = HOME_ENTRIES.get(index) {
                    self.open_home_entry(entry);
                }
            }
            Screen::WindowTopics => {
                if let Some(topic) = WindowTopic::from_index(index) {
                    self.go_to(Screen::Picker(PickerTarget::Window(topic)));
                }
            }
            Screen::Picker(PickerTarget::Category(category)) => {
                self.go_to(Screen::Question(QuestionRef::new(category, index)));
            }
            Screen::Picker(PickerTarget::Window(topic)) => {
                let at = QuestionRef::new(Category::Windows, topic.index()).with_sub(index);
                self.go_to(Screen::Question(at));
            }
            _ => {}
        }
    }

    fn open_home_entry(&mut self, entry: HomeEntry) {
        match entry {
            HomeEntry::Windows => self.go_to(Screen::WindowTopics),
            HomeEntry::Picker(category) => {
                self.go_to(Screen::Picker(PickerTarget::Category(category)))
            }
            HomeEntry::QuickQuestions => self.open_at_progress(Category::QuickQuestions),
            HomeEntry::SpeedQuestions => self.open_at_progress(Category::SpeedQuestions),
            HomeEntry::AudienceQuestions => {
                self.open_at_progress(Category::AudienceQuestions);
                let len = self.dataset.len(Category::AudienceQuestions);
                let next = self.session.advance_progress(Category::AudienceQuestions, len);
                info!(next, "audience cursor advanced");
            }
        }
    }

    fn open_at_progress(&mut self, category: Category) {
        let len = self.dataset.len(category);
        let index = self.session.current_index(category, len);
        self.go_to(Screen::Question(QuestionRef::new(category, index)));
    }

    /// Route a question-screen key through the rule table.
    pub fn question_key(&mut self, key: ShowKey) {
        let Some(screen) = self.question.as_mut() else {
            return;
        };
        let mut ctx = ShowContext {
            session: &mut self.session,
            dataset: &mut self.dataset,
            cues: self.cues.as_mut(),
        };
        if self.router.dispatch(key, screen, &mut ctx) == Outcome::OpenRating {
            self.go_to(Screen::Rate);
        }
    }

    pub fn rate_action(&mut self, action: FormAction) {
        match action {
            FormAction::Editing => {}
            FormAction::Submit => {
                self.rate_form.apply(&mut self.session);
                // Past the question screen back to where it was picked.
                self.go_back(2);
            }
            FormAction::Cancel => self.go_back(1),
        }
    }

    pub fn score_action(&mut self, action: FormAction) {
        match action {
            FormAction::Editing => {}
            FormAction::Submit => {
                self.score_form.apply(&mut self.session);
                self.go_back(1);
            }
            FormAction::Cancel => self.go_back(1),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount();
    }
}
