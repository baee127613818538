//! Session controller.
//!
//! Owns the top-level phase and the leaderboard. The only mutable state that
//! outlives a single quiz run lives here.
//!
//! ## Phase Transitions
//!
//! ```text
//! Welcome --submit_name--> Quiz --(engine finished)--> Leaderboard
//!    ^                                                      |
//!    +----------------------- restart ----------------------+
//! ```
//!
//! `restart()` is accepted from every phase and never touches the
//! leaderboard.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::ValidationError;
use crate::events::Event;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::quiz::{QuestionSet, QuizEngine, QuizResult};

/// Shortest accepted player name, counted in characters after trimming.
pub const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Welcome,
    Quiz,
    Leaderboard,
}

/// A trimmed player name of at least [`MIN_NAME_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// # Errors
    ///
    /// Returns `ValidationError::NameTooShort` if the trimmed input is
    /// shorter than [`MIN_NAME_LEN`] characters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len < MIN_NAME_LEN {
            return Err(ValidationError::NameTooShort {
                min: MIN_NAME_LEN,
                len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
enum Stage {
    Welcome,
    Quiz {
        player: PlayerName,
        engine: QuizEngine,
    },
    Leaderboard {
        entry_id: Uuid,
    },
}

/// Drives one player at a time through welcome, quiz and leaderboard.
#[derive(Debug)]
pub struct SessionController {
    questions: QuestionSet,
    leaderboard: Leaderboard,
    stage: Stage,
    clock: Clock,
}

impl SessionController {
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            questions,
            leaderboard: Leaderboard::new(),
            stage: Stage::Welcome,
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Welcome => Phase::Welcome,
            Stage::Quiz { .. } => Phase::Quiz,
            Stage::Leaderboard { .. } => Phase::Leaderboard,
        }
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Name of the player currently taking the quiz.
    pub fn player_name(&self) -> Option<&str> {
        match &self.stage {
            Stage::Quiz { player, .. } => Some(player.as_str()),
            _ => None,
        }
    }

    /// Engine for the run in progress.
    pub fn engine(&self) -> Option<&QuizEngine> {
        match &self.stage {
            Stage::Quiz { engine, .. } => Some(engine),
            _ => None,
        }
    }

    /// Entry recorded by the run that just finished.
    pub fn last_entry(&self) -> Option<&LeaderboardEntry> {
        match self.stage {
            Stage::Leaderboard { entry_id } => self.leaderboard.get(entry_id),
            _ => None,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Accept a player name and start a fresh quiz.
    ///
    /// Outside the welcome phase this is ignored and returns no events.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NameTooShort` without changing state if the
    /// trimmed name is too short.
    pub fn submit_name(&mut self, raw: &str) -> Result<Vec<Event>, ValidationError> {
        if !matches!(self.stage, Stage::Welcome) {
            warn!(phase = ?self.phase(), "name ignored outside welcome phase");
            return Ok(Vec::new());
        }

        let player = PlayerName::parse(raw)?;
        let engine = QuizEngine::new(self.questions.clone());
        info!(player = %player, questions = engine.question_count(), "quiz started");

        let mut events = vec![Event::QuizStarted {
            player: player.to_string(),
            question_count: engine.question_count(),
        }];
        events.extend(engine.presented());
        self.stage = Stage::Quiz { player, engine };
        Ok(events)
    }

    /// Forward a one-second tick to the running quiz.
    pub fn tick(&mut self) -> Vec<Event> {
        self.with_engine("tick", QuizEngine::tick)
    }

    /// Forward an answer (0-based option index) to the running quiz.
    pub fn submit_answer(&mut self, selected: usize) -> Vec<Event> {
        self.with_engine("answer", |engine| engine.submit_answer(selected))
    }

    /// Return to the welcome phase, dropping any run in progress.
    ///
    /// Returns `None` when already at the welcome phase.
    pub fn restart(&mut self) -> Option<Event> {
        if matches!(self.stage, Stage::Welcome) {
            return None;
        }
        debug!(from = ?self.phase(), "session restarted");
        self.stage = Stage::Welcome;
        Some(Event::SessionRestarted)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn with_engine(
        &mut self,
        action: &'static str,
        f: impl FnOnce(&mut QuizEngine) -> Vec<Event>,
    ) -> Vec<Event> {
        let phase = self.phase();
        let mut events = match &mut self.stage {
            Stage::Quiz { engine, .. } => f(engine),
            _ => {
                warn!(action, ?phase, "ignored outside quiz phase");
                return Vec::new();
            }
        };

        if let Some(result) = events.iter().find_map(Event::quiz_result) {
            self.finish_quiz(result, &mut events);
        }
        events
    }

    fn finish_quiz(&mut self, result: QuizResult, events: &mut Vec<Event>) {
        let player = match std::mem::replace(&mut self.stage, Stage::Welcome) {
            Stage::Quiz { player, .. } => player,
            other => {
                self.stage = other;
                return;
            }
        };

        let entry = LeaderboardEntry::new(player.into_string(), result, self.clock.today());
        let entry_id = entry.id;
        let name = entry.name.clone();
        let rank = self.leaderboard.add(entry);
        info!(player = %name, score = result.score, rank, "result recorded");

        events.push(Event::LeaderboardUpdated {
            entry_id,
            player: name,
            score: result.score,
            rank,
        });
        self.stage = Stage::Leaderboard { entry_id };
    }
}
