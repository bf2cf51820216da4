//! App configuration (`glance.toml`).
//!
//! ```toml
//! [sheets]
//! backend = "csv"            # csv | http | memory
//! # dir = "/path/to/sheets"
//! # endpoint = "https://sheets.example/api"
//! # token_env = "GLANCE_SHEETS_TOKEN"
//! write_mode = "append"      # append | overwrite
//!
//! [task]
//! question = "What was the cause that started the second most amount of riots?"
//! answers = ["Death", "Officer-involved shooting", "Not riot-related", "Homicide"]
//! correct_answer = 1
//! tick_interval_ms = 10
//! auto_reset = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use api::{ConfigError, SheetsConfig};
use serde::{Deserialize, Serialize};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "GLANCE_CONFIG";
pub const CONFIG_FILENAME: &str = "glance.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub task: TaskConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskConfig {
    #[serde(default = "TaskConfig::default_question")]
    pub question: String,
    #[serde(default = "TaskConfig::default_answers")]
    pub answers: Vec<String>,
    /// Index into `answers` of the choice that completes a trial.
    #[serde(default = "TaskConfig::default_correct_answer")]
    pub correct_answer: usize,
    #[serde(default = "TaskConfig::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Return straight to idle after a correct answer instead of waiting for acknowledgement.
    #[serde(default = "TaskConfig::default_auto_reset")]
    pub auto_reset: bool,
    /// Fixed RNG seed for reproducible variant draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl TaskConfig {
    fn default_question() -> String {
        "What was the cause that started the second most amount of riots?".to_string()
    }

    fn default_answers() -> Vec<String> {
        ["Death", "Officer-involved shooting", "Not riot-related", "Homicide"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn default_correct_answer() -> usize {
        1
    }

    fn default_tick_interval_ms() -> u64 {
        10
    }

    fn default_auto_reset() -> bool {
        true
    }

    /// Repair settings that would leave the task unplayable.
    pub fn sanitized(mut self) -> Self {
        if self.answers.is_empty() {
            tracing::warn!("task.answers is empty; using default answers");
            self.answers = Self::default_answers();
            self.correct_answer = Self::default_correct_answer();
        }
        if self.correct_answer >= self.answers.len() {
            tracing::warn!(
                correct_answer = self.correct_answer,
                answers = self.answers.len(),
                "task.correct_answer out of range; using the first answer"
            );
            self.correct_answer = 0;
        }
        if self.tick_interval_ms == 0 {
            self.tick_interval_ms = Self::default_tick_interval_ms();
        }
        self
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            question: Self::default_question(),
            answers: Self::default_answers(),
            correct_answer: Self::default_correct_answer(),
            tick_interval_ms: Self::default_tick_interval_ms(),
            auto_reset: Self::default_auto_reset(),
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg.sanitized())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &contents)
    }

    /// Load `path` if it exists. Missing files and invalid contents fall back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "loaded config");
                cfg
            }
            Err(err) => {
                tracing::warn!(%err, "using default config");
                Self::default()
            }
        }
    }

    /// `$GLANCE_CONFIG`, else `glance.toml` in the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(explicit));
        }
        super::storage::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    fn sanitized(mut self) -> Self {
        self.task = self.task.sanitized();
        self
    }
}
