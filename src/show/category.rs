use serde::{Deserialize, Serialize};

/// The question modes a show runs through. Closed set: the rule table has an
/// entry for every variant, so there is no "unknown category" at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    SpeedQuestions,
    QuickQuestions,
    Puzzles,
    Windows,
    Debate,
    PoeticChase,
    AskSmartly,
    AudienceQuestions,
}

/// How a category's questions are laid out in the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Flat,
    Grouped,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::SpeedQuestions,
        Category::QuickQuestions,
        Category::Puzzles,
        Category::Windows,
        Category::Debate,
        Category::PoeticChase,
        Category::AskSmartly,
        Category::AudienceQuestions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::SpeedQuestions => "speedQuestions",
            Category::QuickQuestions => "quickQuestions",
            Category::Puzzles => "puzzles",
            Category::Windows => "windows",
            Category::Debate => "debate",
            Category::PoeticChase => "poeticChase",
            Category::AskSmartly => "askSmartly",
            Category::AudienceQuestions => "audienceQuestions",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::SpeedQuestions => "Speed Questions",
            Category::QuickQuestions => "Quick Questions",
            Category::Puzzles => "Puzzles",
            Category::Windows => "Windows",
            Category::Debate => "Debate",
            Category::PoeticChase => "Poetic Chase",
            Category::AskSmartly => "Ask Smartly",
            Category::AudienceQuestions => "Audience Questions",
        }
    }

    /// Quick-question sets and window topics are sequences of sequences.
    pub fn shape(self) -> Shape {
        match self {
            Category::QuickQuestions | Category::Windows => Shape::Grouped,
            _ => Shape::Flat,
        }
    }
}

/// The five topics behind the windows category, in menu order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowTopic {
    Religion,
    HumanSciences,
    NaturalSciences,
    Arts,
    Misc,
}

impl WindowTopic {
    pub const ALL: [WindowTopic; 5] = [
        WindowTopic::Religion,
        WindowTopic::HumanSciences,
        WindowTopic::NaturalSciences,
        WindowTopic::Arts,
        WindowTopic::Misc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WindowTopic::Religion => "religion",
            WindowTopic::HumanSciences => "humanSciences",
            WindowTopic::NaturalSciences => "naturalSciences",
            WindowTopic::Arts => "arts",
            WindowTopic::Misc => "misc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindowTopic::Religion => "Religion & Biography",
            WindowTopic::HumanSciences => "Human Sciences",
            WindowTopic::NaturalSciences => "Natural Sciences",
            WindowTopic::Arts => "Literature & Arts",
            WindowTopic::Misc => "General Questions",
        }
    }

    /// Position of the topic inside the windows group list.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// One of the two competing teams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}
