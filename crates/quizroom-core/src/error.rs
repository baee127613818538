//! Core error types for quizroom-core.
//!
//! This module defines the error hierarchy using thiserror. Protocol
//! violations (answers or ticks outside an active quiz) are deliberately
//! absent: the engine logs and ignores them instead of returning an error.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for quizroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
///
/// Covers both the TOML settings file and the question list a quiz is
/// built from. A malformed question list is fatal to starting a session.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Config directory could not be created
    #[error("Failed to prepare config directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Question list has no entries
    #[error("Question list is empty")]
    EmptyQuestionSet,

    /// Two questions share an identifier
    #[error("Duplicate question id {0}")]
    DuplicateQuestionId(u32),

    /// Correct answer points past the option list
    #[error("Question {question_id}: correct answer index {index} out of range for {options} options")]
    CorrectAnswerOutOfRange {
        question_id: u32,
        index: usize,
        options: usize,
    },

    /// Time limit must be at least one second
    #[error("Question {question_id}: time limit must be a positive number of seconds")]
    ZeroTimeLimit { question_id: u32 },
}

/// Validation errors for user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Player name too short after trimming
    #[error("Please enter a valid name (at least {min} characters)")]
    NameTooShort { min: usize, len: usize },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
