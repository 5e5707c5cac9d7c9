// config.rs

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "calculator.log";
pub const HISTORY_FILE_NAME: &str = "history.csv";

/// Session-wide settings, read once from `CALCULATOR_*` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    pub log_dir: PathBuf,
    pub history_dir: PathBuf,
    pub max_history_size: usize,
    pub auto_save: bool,
    pub precision: u32,
    pub max_input_value: f64,
    pub max_undo_depth: Option<usize>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            history_dir: PathBuf::from("history"),
            max_history_size: 100,
            auto_save: true,
            precision: 10,
            max_input_value: 1e308,
            max_undo_depth: None,
        }
    }
}

impl CalculatorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(dir) = lookup("CALCULATOR_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("CALCULATOR_HISTORY_DIR") {
            config.history_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("CALCULATOR_MAX_HISTORY_SIZE") {
            config.max_history_size = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("CALCULATOR_MAX_HISTORY_SIZE", raw, "a positive integer")),
            };
        }
        if let Some(raw) = lookup("CALCULATOR_AUTO_SAVE") {
            config.auto_save = matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes");
        }
        if let Some(raw) = lookup("CALCULATOR_PRECISION") {
            config.precision = raw
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid("CALCULATOR_PRECISION", raw, "a non-negative integer"))?;
        }
        if let Some(raw) = lookup("CALCULATOR_MAX_INPUT_VALUE") {
            config.max_input_value = match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => v,
                _ => return Err(invalid("CALCULATOR_MAX_INPUT_VALUE", raw, "a positive number")),
            };
        }
        if let Some(raw) = lookup("CALCULATOR_DEFAULT_ENCODING") {
            let normalized = raw.trim().to_lowercase();
            if normalized != "utf-8" && normalized != "utf8" {
                return Err(invalid("CALCULATOR_DEFAULT_ENCODING", raw, "utf-8"));
            }
        }
        if let Some(raw) = lookup("CALCULATOR_MAX_UNDO_DEPTH") {
            config.max_undo_depth = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => return Err(invalid("CALCULATOR_MAX_UNDO_DEPTH", raw, "a positive integer")),
            };
        }
        Ok(config)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    pub fn history_file(&self) -> PathBuf {
        self.history_dir.join(HISTORY_FILE_NAME)
    }

    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        create_dir(&self.log_dir)?;
        create_dir(&self.history_dir)
    }
}

fn create_dir(path: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(path).map_err(|source| ConfigError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(key: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::Invalid { key, value, expected }
}
