pub mod config;
pub mod play;
pub mod questions;
pub mod simulate;

use std::path::Path;

use quizroom_core::{Config, ConfigError, QuestionSet};

/// Question set from an explicit file, falling back to the configured one.
pub fn resolve_questions(path: Option<&Path>, config: &Config) -> Result<QuestionSet, ConfigError> {
    match path {
        Some(path) => QuestionSet::load(path),
        None => config.questions(),
    }
}
