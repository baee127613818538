//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - An optional custom questions file
//! - Countdown tick interval and timer visibility
//! - Leaderboard date format
//!
//! Configuration is stored at `~/.config/quizroom/config.toml`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::quiz::QuestionSet;

/// Quiz content configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// TOML questions file. The built-in set is used when unset.
    #[serde(default)]
    pub questions_path: Option<PathBuf>,
}

/// Terminal display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Milliseconds between countdown ticks.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// strftime pattern for leaderboard dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_true")]
    pub show_timer: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/quizroom/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Keys backed by an `Option`. Setting one to an empty string unsets it.
const OPTIONAL_KEYS: &[&str] = &["quiz.questions_path"];

// Default functions
fn default_tick_ms() -> u64 {
    1000
}
fn default_date_format() -> String {
    "%Y-%m-%d".into()
}
fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            date_format: default_date_format(),
            show_timer: true,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    _ if value.is_empty() && OPTIONAL_KEYS.contains(&key) => {
                        serde_json::Value::Null
                    }
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("only leaf values can be set".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Full path of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing the defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if the file exists but cannot be
    /// read; it is never overwritten in that case.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Parse and validate a config file body.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseFailed` for malformed TOML and
    /// `ConfigError::InvalidValue` for out-of-range settings.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: Config =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check settings that the type system does not.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero tick interval or an
    /// unparseable date format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "display.tick_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidValue {
                key: "display.date_format".into(),
                message: format!("invalid strftime pattern '{}'", self.display.date_format),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// Unset optional values come back as an empty string.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation. On error `self` is unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Question set for new sessions: the configured file, or the built-in set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file cannot be loaded or is malformed.
    pub fn questions(&self) -> Result<QuestionSet, ConfigError> {
        match &self.quiz.questions_path {
            Some(path) => QuestionSet::load(path),
            None => Ok(QuestionSet::sample()),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.display.tick_ms, 1000);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed = Config::from_toml_str("[display]\nshow_timer = false\n").unwrap();
        assert!(!parsed.display.show_timer);
        assert_eq!(parsed.display.date_format, "%Y-%m-%d");
        assert!(parsed.quiz.questions_path.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("display.show_timer").as_deref(), Some("true"));
        assert_eq!(cfg.get("display.tick_ms").as_deref(), Some("1000"));
        assert_eq!(cfg.get("display.date_format").as_deref(), Some("%Y-%m-%d"));
        assert!(cfg.get("display.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "display.tick_ms", "250").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "display.tick_ms").unwrap(),
            &serde_json::Value::Number(250.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "display.nonexistent", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
        let result = Config::set_json_value_by_path(&mut json, "", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "display.show_timer", "maybe");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn apply_sets_optional_questions_path() {
        let mut cfg = Config::default();
        cfg.apply("quiz.questions_path", "/tmp/questions.toml").unwrap();
        assert_eq!(
            cfg.quiz.questions_path,
            Some(PathBuf::from("/tmp/questions.toml"))
        );
        cfg.apply("quiz.questions_path", "/tmp/other.toml").unwrap();
        assert_eq!(cfg.get("quiz.questions_path").as_deref(), Some("/tmp/other.toml"));
    }

    #[test]
    fn empty_value_clears_questions_path() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get("quiz.questions_path").as_deref(), Some(""));

        cfg.apply("quiz.questions_path", "/tmp/questions.toml").unwrap();
        cfg.apply("quiz.questions_path", "").unwrap();
        assert!(cfg.quiz.questions_path.is_none());
        assert_eq!(cfg.get("quiz.questions_path").as_deref(), Some(""));
        assert_eq!(cfg.questions().unwrap(), QuestionSet::sample());
    }

    #[test]
    fn empty_value_is_still_rejected_for_required_keys() {
        let mut cfg = Config::default();
        assert!(cfg.apply("display.tick_ms", "").is_err());
        assert!(cfg.apply("display.show_timer", "").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_unreadable_file_fails_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let bytes = [0xff_u8, 0xfe, 0x00, 0x74];
        std::fs::write(&path, bytes).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn apply_rejects_zero_tick_and_keeps_old_value() {
        let mut cfg = Config::default();
        let err = cfg.apply("display.tick_ms", "0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "display.tick_ms"));
        assert_eq!(cfg.display.tick_ms, 1000);
    }

    #[test]
    fn invalid_date_format_fails_validation() {
        let mut cfg = Config::default();
        cfg.display.date_format = "%Q".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn questions_default_to_builtin_set() {
        let cfg = Config::default();
        assert_eq!(cfg.questions().unwrap(), QuestionSet::sample());
    }

    #[test]
    fn questions_load_from_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.toml");
        std::fs::write(
            &path,
            "[[questions]]\nid = 1\nquestion = \"2 + 2?\"\noptions = [\"3\", \"4\", \"5\", \"22\"]\ncorrect_answer = 1\ntime_limit_secs = 15\n",
        )
        .unwrap();

        let mut cfg = Config::default();
        cfg.quiz.questions_path = Some(path);
        let set = cfg.questions().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().time_limit_secs, 15);
    }
}
