mod config;

pub use config::{Config, DisplayConfig, QuizConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the config directory.
///
/// `QUIZROOM_CONFIG_DIR` overrides the location entirely. Otherwise this is
/// `~/.config/quizroom[-dev]/`, with `QUIZROOM_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("QUIZROOM_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("QUIZROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("quizroom-dev")
            } else {
                base_dir.join("quizroom")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
