use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::show::rules::ShowRules;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub dataset_path: Option<String>,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_cue_dir")]
    pub cue_dir: String,
    #[serde(default = "default_max_volume")]
    pub max_volume: f32,
    #[serde(default = "default_auto_mark_done_on_enter")]
    pub auto_mark_done_on_enter: bool,
    #[serde(default)]
    pub rules: ShowRules,
}

fn default_theme() -> String {
    "stage-dark".to_string()
}
fn default_tick_rate_ms() -> u64 {
    50
}
fn default_cue_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("showrunner")
        .join("cues")
        .to_string_lossy()
        .to_string()
}
fn default_max_volume() -> f32 {
    1.0
}
fn default_auto_mark_done_on_enter() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            dataset_path: None,
            tick_rate_ms: default_tick_rate_ms(),
            cue_dir: default_cue_dir(),
            max_volume: default_max_volume(),
            auto_mark_done_on_enter: default_auto_mark_done_on_enter(),
            rules: ShowRules::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Missing file means defaults; a present but malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("showrunner")
            .join("config.toml")
    }

    pub fn default_log_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("showrunner")
            .join("showrunner.log")
    }

    /// Clamp values that would stall the frame loop or clip the audio.
    pub fn normalize(&mut self) {
        self.tick_rate_ms = self.tick_rate_ms.clamp(10, 1000);
        if !self.max_volume.is_finite() {
            self.max_volume = default_max_volume();
        }
        self.max_volume = self.max_volume.clamp(0.0, 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "stage-dark");
        assert_eq!(config.tick_rate_ms, 50);
        assert_eq!(config.dataset_path, None);
        assert!(config.auto_mark_done_on_enter);
        assert_eq!(config.rules, ShowRules::default());
        assert!(config.cue_dir.contains("cues"));
    }

    #[test]
    fn test_partial_rules_table_keeps_other_defaults() {
        let toml_str = r#"
theme = "stage-light"
auto_mark_done_on_enter = false

[rules]
chase_bonus = 20
debate_durations = [60, 120]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "stage-light");
        assert!(!config.auto_mark_done_on_enter);
        assert_eq!(config.rules.chase_bonus, 20);
        assert_eq!(config.rules.debate_durations, [60, 120]);
        assert_eq!(config.rules.chase_penalty, 5);
        assert_eq!(config.rules.ask_duration, 120);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.tick_rate_ms, 50);
    }

    #[test]
    fn test_load_from_normalizes_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick_rate_ms = 1\nmax_volume = 9.0\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tick_rate_ms, 10);
        assert_eq!(config.max_volume, 2.0);
    }

    #[test]
    fn test_load_from_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "tick_rate_ms = \"fast\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.rules, deserialized.rules);
        assert_eq!(config.cue_dir, deserialized.cue_dir);
    }
}
