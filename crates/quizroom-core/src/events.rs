use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quiz::{QuizResult, QuizState};

/// Every state change in the quiz produces an Event.
/// The presentation layer renders them; none of them carry wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    QuizStarted {
        player: String,
        question_count: usize,
    },
    /// A question became active with a full countdown.
    QuestionPresented {
        question_index: usize,
        question_id: u32,
        time_limit_secs: u32,
    },
    CountdownTicked {
        question_index: usize,
        remaining_secs: u32,
        elapsed_secs: u32,
    },
    AnswerCorrect {
        question_index: usize,
        question_id: u32,
        points_awarded: u32,
        time_bonus: u32,
    },
    AnswerIncorrect {
        question_index: usize,
        question_id: u32,
        selected: usize,
        correct_answer: usize,
    },
    /// Countdown ran out before an answer arrived. Scores nothing.
    QuestionTimedOut {
        question_index: usize,
        question_id: u32,
    },
    QuizFinished {
        score: u32,
        elapsed_secs: u32,
    },
    LeaderboardUpdated {
        entry_id: Uuid,
        player: String,
        score: u32,
        rank: usize,
    },
    SessionRestarted,
    StateSnapshot {
        state: QuizState,
        question_index: usize,
        question_count: usize,
        remaining_secs: u32,
        time_limit_secs: u32,
        score: u32,
        elapsed_secs: u32,
    },
}

impl Event {
    /// Toast-style notification for answer events.
    pub fn notification(&self) -> Option<Notification> {
        match *self {
            Event::AnswerCorrect {
                points_awarded,
                time_bonus,
                ..
            } => Some(Notification {
                kind: NotificationKind::Correct,
                points_awarded,
                time_bonus,
            }),
            Event::AnswerIncorrect { .. } => Some(Notification {
                kind: NotificationKind::Incorrect,
                points_awarded: 0,
                time_bonus: 0,
            }),
            _ => None,
        }
    }

    /// Final result, if this is the terminal quiz event.
    pub fn quiz_result(&self) -> Option<QuizResult> {
        match *self {
            Event::QuizFinished {
                score,
                elapsed_secs,
            } => Some(QuizResult {
                score,
                elapsed_secs,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Correct,
    Incorrect,
}

/// Feedback shown to the player right after answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub points_awarded: u32,
    pub time_bonus: u32,
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self.kind {
            NotificationKind::Correct => "Correct!",
            NotificationKind::Incorrect => "Incorrect",
        }
    }

    pub fn description(&self) -> String {
        match self.kind {
            NotificationKind::Correct => format!(
                "+{} points (including {} time bonus)",
                self.points_awarded, self.time_bonus
            ),
            NotificationKind::Incorrect => "No points awarded".to_string(),
        }
    }
}
