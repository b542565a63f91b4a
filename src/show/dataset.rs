use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::show::category::{Category, Shape, Side, WindowTopic};

#[derive(Embed)]
#[folder = "assets/show/"]
struct ShowAssets;

const BUNDLED_SHOW: &str = "sample.json";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("section `{tag}` does not match the {shape:?} layout: {source}")]
    Section {
        tag: String,
        shape: Shape,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, rename = "duration", alias = "durationSeconds")]
    pub duration_seconds: Option<u32>,
    #[serde(default, alias = "media")]
    pub media_ref: Option<String>,
    #[serde(default)]
    pub done: bool,
}

impl Question {
    /// Stand-in shown when the dataset has nothing at the requested address.
    /// Duration is left empty so the category default applies.
    pub fn placeholder(category: Category) -> Self {
        Self {
            text: format!("{} (no question loaded)", category.label()),
            answer: None,
            duration_seconds: None,
            media_ref: None,
            done: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Section {
    Flat(Vec<Question>),
    Grouped(Vec<Vec<Question>>),
}

impl Section {
    fn len(&self) -> usize {
        match self {
            Section::Flat(questions) => questions.len(),
            Section::Grouped(groups) => groups.len(),
        }
    }
}

/// Address of one question. `sub` selects inside a group (quick-question set,
/// window topic) and is ignored for flat categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestionRef {
    pub category: Category,
    pub index: usize,
    pub sub: Option<usize>,
}

impl QuestionRef {
    pub fn new(category: Category, index: usize) -> Self {
        Self {
            category,
            index,
            sub: None,
        }
    }

    pub fn with_sub(self, sub: usize) -> Self {
        Self {
            sub: Some(sub),
            ..self
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    #[serde(default = "default_left_team")]
    left_team_name: String,
    #[serde(default = "default_right_team")]
    right_team_name: String,
    #[serde(default)]
    parts: BTreeMap<String, Value>,
}

fn default_left_team() -> String {
    "Left Team".to_string()
}

fn default_right_team() -> String {
    "Right Team".to_string()
}

/// All questions of a show, loaded once and mutated in place only through
/// [`QuestionDataset::toggle_done`].
#[derive(Clone, Debug)]
pub struct QuestionDataset {
    pub left_team_name: String,
    pub right_team_name: String,
    sections: BTreeMap<Category, Section>,
}

impl Default for QuestionDataset {
    fn default() -> Self {
        Self {
            left_team_name: default_left_team(),
            right_team_name: default_right_team(),
            sections: BTreeMap::new(),
        }
    }
}

impl QuestionDataset {
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&content)?;
        info!(path = %path.display(), "loaded show dataset");
        Ok(dataset)
    }

    /// The sample show compiled into the binary. Falls back to an empty
    /// dataset (every screen shows placeholders) if the asset is unusable.
    pub fn bundled() -> Self {
        let Some(file) = ShowAssets::get(BUNDLED_SHOW) else {
            warn!("bundled show asset missing");
            return Self::default();
        };
        let parsed = std::str::from_utf8(file.data.as_ref())
            .ok()
            .map(Self::from_json);
        match parsed {
            Some(Ok(dataset)) => dataset,
            Some(Err(err)) => {
                warn!(%err, "bundled show asset is malformed");
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset = serde_json::from_str(json)?;
        let mut sections = BTreeMap::new();

        for (tag, value) in raw.parts {
            let Some(category) = Category::from_tag(&tag) else {
                warn!(tag = %tag, "skipping unknown category in dataset");
                continue;
            };
            sections.insert(category, parse_section(category, &tag, value)?);
        }

        Ok(Self {
            left_team_name: raw.left_team_name,
            right_team_name: raw.right_team_name,
            sections,
        })
    }

    pub fn team_name(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left_team_name,
            Side::Right => &self.right_team_name,
        }
    }

    /// Number of top-level entries: questions for flat categories, groups for
    /// grouped ones.
    pub fn len(&self, category: Category) -> usize {
        self.sections.get(&category).map_or(0, Section::len)
    }

    pub fn group_len(&self, category: Category, index: usize) -> usize {
        match self.sections.get(&category) {
            Some(Section::Grouped(groups)) => groups.get(index).map_or(0, Vec::len),
            _ => 0,
        }
    }

    pub fn group(&self, category: Category, index: usize) -> &[Question] {
        match self.sections.get(&category) {
            Some(Section::Grouped(groups)) => groups.get(index).map_or(&[][..], Vec::as_slice),
            _ => &[],
        }
    }

    pub fn questions(&self, category: Category) -> &[Question] {
        match self.sections.get(&category) {
            Some(Section::Flat(questions)) => questions.as_slice(),
            _ => &[],
        }
    }

    pub fn get(&self, at: QuestionRef) -> Option<&Question> {
        match self.sections.get(&at.category)? {
            Section::Flat(questions) => questions.get(at.index),
            Section::Grouped(groups) => groups.get(at.index)?.get(at.sub.unwrap_or(0)),
        }
    }

    fn get_mut(&mut self, at: QuestionRef) -> Option<&mut Question> {
        match self.sections.get_mut(&at.category)? {
            Section::Flat(questions) => questions.get_mut(at.index),
            Section::Grouped(groups) => groups.get_mut(at.index)?.get_mut(at.sub.unwrap_or(0)),
        }
    }

    /// The addressed question, or the category placeholder when absent.
    pub fn resolve(&self, at: QuestionRef) -> Cow<'_, Question> {
        match self.get(at) {
            Some(question) => Cow::Borrowed(question),
            None => Cow::Owned(Question::placeholder(at.category)),
        }
    }

    /// Flip the done flag of the addressed question. Returns the new value, or
    /// `None` when nothing lives at that address.
    pub fn toggle_done(&mut self, at: QuestionRef) -> Option<bool> {
        let question = self.get_mut(at)?;
        question.done = !question.done;
        info!(
            category = at.category.as_str(),
            index = at.index,
            sub = ?at.sub,
            done = question.done,
            "toggled done flag"
        );
        Some(question.done)
    }

    pub fn is_done(&self, at: QuestionRef) -> bool {
        self.get(at).is_some_and(|q| q.done)
    }

    /// A group counts as done once every question in it is done.
    pub fn group_done(&self, category: Category, index: usize) -> bool {
        let group = self.group(category, index);
        !group.is_empty() && group.iter().all(|q| q.done)
    }
}

fn parse_section(category: Category, tag: &str, value: Value) -> Result<Section, DatasetError> {
    let shape = category.shape();
    let section_err = |source| DatasetError::Section {
        tag: tag.to_string(),
        shape,
        source,
    };

    match (category, shape) {
        (Category::Windows, _) => {
            let mut topics: BTreeMap<String, Vec<Question>> =
                serde_json::from_value(value).map_err(section_err)?;
            let groups = WindowTopic::ALL
                .iter()
                .map(|topic| topics.remove(topic.as_str()).unwrap_or_default())
                .collect();
            for leftover in topics.keys() {
                warn!(topic = %leftover, "skipping unknown window topic");
            }
            Ok(Section::Grouped(groups))
        }
        (_, Shape::Grouped) => Ok(Section::Grouped(
            serde_json::from_value(value).map_err(section_err)?,
        )),
        (_, Shape::Flat) => Ok(Section::Flat(
            serde_json::from_value(value).map_err(section_err)?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW: &str = r#"{
        "leftTeamName": "Owls",
        "rightTeamName": "Foxes",
        "parts": {
            "puzzles": [
                { "text": "P1", "answer": "A1", "duration": 30 },
                { "text": "P2", "mediaRef": "p2.png" }
            ],
            "quickQuestions": [
                [ { "text": "Q1a" }, { "text": "Q1b" } ],
                [ { "text": "Q2a" } ]
            ],
            "windows": {
                "arts": [ { "text": "W1" }, { "text": "W2" } ],
                "misc": [ { "text": "W3" } ]
            },
            "lightningRound": [ { "text": "ignored" } ]
        }
    }"#;

    #[test]
    fn parses_flat_grouped_and_window_sections() {
        let data = QuestionDataset::from_json(SHOW).unwrap();
        assert_eq!(data.team_name(Side::Left), "Owls");
        assert_eq!(data.team_name(Side::Right), "Foxes");
        assert_eq!(data.len(Category::Puzzles), 2);
        assert_eq!(data.len(Category::QuickQuestions), 2);
        assert_eq!(data.group_len(Category::QuickQuestions, 0), 2);
        assert_eq!(data.len(Category::Windows), 5);
        assert_eq!(data.group_len(Category::Windows, WindowTopic::Arts.index()), 2);
        assert_eq!(data.group_len(Category::Windows, WindowTopic::Religion.index()), 0);

        let p2 = data.get(QuestionRef::new(Category::Puzzles, 1)).unwrap();
        assert_eq!(p2.media_ref.as_deref(), Some("p2.png"));
        assert_eq!(p2.duration_seconds, None);
    }

    #[test]
    fn unknown_category_is_skipped() {
        let data = QuestionDataset::from_json(SHOW).unwrap();
        assert_eq!(data.len(Category::SpeedQuestions), 0);
    }

    #[test]
    fn wrong_shape_names_the_section() {
        let err = QuestionDataset::from_json(r#"{ "parts": { "quickQuestions": [ { "text": "flat" } ] } }"#)
            .unwrap_err();
        match err {
            DatasetError::Section { tag, .. } => assert_eq!(tag, "quickQuestions"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_question_resolves_to_placeholder() {
        let data = QuestionDataset::from_json(SHOW).unwrap();
        let q = data.resolve(QuestionRef::new(Category::Debate, 3));
        assert!(q.text.contains("Debate"));
        assert!(matches!(q, Cow::Owned(_)));

        let q = data.resolve(QuestionRef::new(Category::QuickQuestions, 0).with_sub(1));
        assert_eq!(q.text, "Q1b");
    }

    #[test]
    fn toggle_done_parity() {
        let mut data = QuestionDataset::from_json(SHOW).unwrap();
        let at = QuestionRef::new(Category::Puzzles, 0);
        for n in 1..=6 {
            data.toggle_done(at);
            assert_eq!(data.is_done(at), n % 2 == 1, "after {n} toggles");
        }
    }

    #[test]
    fn toggle_done_on_missing_question_is_none() {
        let mut data = QuestionDataset::from_json(SHOW).unwrap();
        assert_eq!(data.toggle_done(QuestionRef::new(Category::Puzzles, 9)), None);
    }

    #[test]
    fn window_topic_done_needs_every_question() {
        let mut data = QuestionDataset::from_json(SHOW).unwrap();
        let arts = WindowTopic::Arts.index();
        data.toggle_done(QuestionRef::new(Category::Windows, arts).with_sub(0));
        assert!(!data.group_done(Category::Windows, arts));
        data.toggle_done(QuestionRef::new(Category::Windows, arts).with_sub(1));
        assert!(data.group_done(Category::Windows, arts));
        assert!(!data.group_done(Category::Windows, WindowTopic::Religion.index()));
    }

    #[test]
    fn bundled_show_has_every_category() {
        let data = QuestionDataset::bundled();
        for category in Category::ALL {
            assert!(data.len(category) > 0, "{} empty", category.as_str());
        }
    }
}
