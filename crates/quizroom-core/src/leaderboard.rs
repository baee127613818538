//! In-memory leaderboard of completed runs.
//!
//! Append-only: entries are never edited or removed. The store keeps them
//! ordered by score, highest first, with equal scores in insertion order.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quiz::QuizResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Time-ordered UUIDv7 assigned at creation.
    pub id: Uuid,
    pub name: String,
    pub score: u32,
    pub elapsed_secs: u32,
    pub date: NaiveDate,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, result: QuizResult, date: NaiveDate) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            score: result.score,
            elapsed_secs: result.elapsed_secs,
            date,
        }
    }

    /// Date rendered with a strftime pattern. Falls back to ISO-8601 when
    /// the pattern is invalid.
    pub fn formatted_date(&self, format: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.date.format(format)).is_err() {
            return self.date.to_string();
        }
        out
    }
}

/// Podium tier for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// `rank` is 1-based.
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Medal::Gold => "gold",
            Medal::Silver => "silver",
            Medal::Bronze => "bronze",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub medal: Option<Medal>,
    pub entry: &'a LeaderboardEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry and return its 1-based rank.
    pub fn add(&mut self, entry: LeaderboardEntry) -> usize {
        let id = entry.id;
        self.entries.push(entry);
        // Stable sort: ties keep insertion order.
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.rank_of(id).unwrap_or(self.entries.len())
    }

    /// Entries in display order.
    pub fn snapshot(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn ranked(&self) -> impl Iterator<Item = RankedEntry<'_>> {
        self.entries.iter().enumerate().map(|(i, entry)| RankedEntry {
            rank: i + 1,
            medal: Medal::for_rank(i + 1),
            entry,
        })
    }

    pub fn rank_of(&self, id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id).map(|i| i + 1)
    }

    pub fn get(&self, id: Uuid) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
