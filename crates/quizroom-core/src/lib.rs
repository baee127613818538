//! # Quizroom Core Library
//!
//! This library provides the core logic for the Quizroom trivia quiz. The
//! CLI binary is a thin terminal layer over the same types; any other front
//! end only needs to render events and forward user intents.
//!
//! ## Architecture
//!
//! - **Quiz Engine**: A tick-driven state machine over a fixed question list.
//!   It owns no timer; the caller invokes `tick()` once per second
//! - **Session Controller**: Owns the welcome/quiz/leaderboard phase and
//!   hands finished runs to the leaderboard
//! - **Leaderboard**: In-memory, append-only, sorted by score
//! - **Storage**: TOML configuration and questions files
//!
//! ## Key Components
//!
//! - [`QuizEngine`]: Question sequencing, countdown and scoring
//! - [`SessionController`]: Phase transitions and result handoff
//! - [`Leaderboard`]: Ranked results for the process lifetime
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod quiz;
pub mod session;
pub mod storage;

pub use clock::Clock;
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{Event, Notification, NotificationKind};
pub use leaderboard::{Leaderboard, LeaderboardEntry, Medal, RankedEntry};
pub use quiz::{Question, QuestionSet, QuestionView, QuizEngine, QuizResult, QuizState};
pub use session::{Phase, PlayerName, SessionController};
pub use storage::Config;
