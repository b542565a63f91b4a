use std::fmt;

use tracing::debug;

use crate::show::category::{Category, WindowTopic};
use crate::show::dataset::QuestionRef;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerTarget {
    Category(Category),
    Window(WindowTopic),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Home,
    WindowTopics,
    Picker(PickerTarget),
    Question(QuestionRef),
    Rate,
    ScoreEditor,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Home => write!(f, "/"),
            Screen::WindowTopics => write!(f, "/windows"),
            Screen::Picker(PickerTarget::Category(c)) => write!(f, "/questionpicker/{}", c.as_str()),
            Screen::Picker(PickerTarget::Window(t)) => write!(f, "/questionpicker/{}", t.as_str()),
            Screen::Question(at) => {
                match WindowTopic::from_index(at.index).filter(|_| at.category == Category::Windows) {
                    Some(topic) => write!(f, "/question/windows/{}", topic.as_str())?,
                    None => write!(f, "/question/{}/{}", at.category.as_str(), at.index)?,
                }
                if let Some(sub) = at.sub {
                    write!(f, "/{sub}")?;
                }
                Ok(())
            }
            Screen::Rate => write!(f, "/rate"),
            Screen::ScoreEditor => write!(f, "/set"),
        }
    }
}

/// Screen routing seam: "go to X", "go back N".
pub trait Navigator {
    fn go_to(&mut self, screen: Screen);
    fn go_back(&mut self, steps: usize);
    fn current(&self) -> Screen;
}

/// History stack rooted at [`Screen::Home`]; the root is never popped.
#[derive(Clone, Debug)]
pub struct ScreenStack {
    history: Vec<Screen>,
}

impl Default for ScreenStack {
    fn default() -> Self {
        Self {
            history: vec![Screen::Home],
        }
    }
}

impl ScreenStack {
    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

impl Navigator for ScreenStack {
    fn go_to(&mut self, screen: Screen) {
        debug!(to = %screen, "navigate");
        self.history.push(screen);
    }

    fn go_back(&mut self, steps: usize) {
        let keep = self.history.len().saturating_sub(steps).max(1);
        self.history.truncate(keep);
        debug!(to = %self.current(), steps, "navigate back");
    }

    fn current(&self) -> Screen {
        self.history.last().copied().unwrap_or(Screen::Home)
    }
}
