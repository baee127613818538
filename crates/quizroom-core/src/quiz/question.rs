use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    pub options: [String; OPTION_COUNT],
    /// 0-based index into `options`.
    pub correct_answer: usize,
    pub time_limit_secs: u32,
}

impl Question {
    pub fn new(
        id: u32,
        question: impl Into<String>,
        options: [&str; OPTION_COUNT],
        correct_answer: usize,
        time_limit_secs: u32,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            options: options.map(str::to_string),
            correct_answer,
            time_limit_secs,
        }
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.correct_answer >= self.options.len() {
            return Err(ConfigError::CorrectAnswerOutOfRange {
                question_id: self.id,
                index: self.correct_answer,
                options: self.options.len(),
            });
        }
        if self.time_limit_secs == 0 {
            return Err(ConfigError::ZeroTimeLimit {
                question_id: self.id,
            });
        }
        Ok(())
    }
}

/// On-disk shape of a questions file: a TOML array of tables.
#[derive(Debug, Serialize, Deserialize)]
struct QuestionFile {
    questions: Vec<Question>,
}

/// A validated, non-empty, ordered list of questions.
///
/// Holding a `QuestionSet` means every question passed validation, so the
/// engine can index into it without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Validate and wrap a list of questions.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the list is empty, an id repeats, a correct
    /// answer index is out of range, or a time limit is zero.
    pub fn new(questions: Vec<Question>) -> Result<Self, ConfigError> {
        if questions.is_empty() {
            return Err(ConfigError::EmptyQuestionSet);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(ConfigError::DuplicateQuestionId(question.id));
            }
            question.validate()?;
        }
        Ok(Self { questions })
    }

    /// Parse a TOML questions file body.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseFailed` for malformed TOML (including a
    /// wrong number of options) and any validation error from [`QuestionSet::new`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: QuestionFile =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::new(file.questions)
    }

    /// Load a questions file from disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if the file cannot be read, or any
    /// parse/validation error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Render in the same TOML layout [`QuestionSet::from_toml_str`] reads.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseFailed` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let file = QuestionFile {
            questions: self.questions.clone(),
        };
        toml::to_string_pretty(&file).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// The built-in general-knowledge set.
    #[rustfmt::skip]
    pub fn sample() -> Self {
        Self {
            questions: vec![
                Question::new(1, "What is the capital of France?", ["London", "Berlin", "Paris", "Madrid"], 2, 30),
                Question::new(2, "Which planet is known as the Red Planet?", ["Venus", "Mars", "Jupiter", "Saturn"], 1, 30),
                Question::new(3, "What is the largest mammal in the world?", ["African Elephant", "Blue Whale", "Giraffe", "Hippopotamus"], 1, 30),
                Question::new(4, "Which programming language was created by Brendan Eich?", ["Python", "Java", "JavaScript", "C++"], 2, 30),
                Question::new(5, "What is the chemical symbol for gold?", ["Ag", "Fe", "Au", "Cu"], 2, 30),
                Question::new(6, "Who painted the Mona Lisa?", ["Vincent van Gogh", "Pablo Picasso", "Leonardo da Vinci", "Michelangelo"], 2, 30),
                Question::new(7, "What is the fastest land animal?", ["Lion", "Cheetah", "Leopard", "Gazelle"], 1, 30),
                Question::new(8, "Which element has the atomic number 1?", ["Helium", "Hydrogen", "Oxygen", "Carbon"], 1, 30),
                Question::new(9, "What is the largest organ in the human body?", ["Heart", "Brain", "Liver", "Skin"], 3, 30),
                Question::new(10, "Who wrote 'To Kill a Mockingbird'?", ["Ernest Hemingway", "Harper Lee", "Mark Twain", "F. Scott Fitzgerald"], 1, 30),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// Sum of every question's countdown, i.e. the longest possible run.
    pub fn total_time_limit_secs(&self) -> u32 {
        self.questions
            .iter()
            .fold(0u32, |acc, q| acc.saturating_add(q.time_limit_secs))
    }

    /// Best achievable score: every answer correct with a full countdown.
    pub fn max_score(&self) -> u32 {
        self.questions.iter().fold(0u32, |acc, q| {
            acc.saturating_add(super::engine::points_for_correct(q.time_limit_secs))
        })
    }
}

impl Default for QuestionSet {
    fn default() -> Self {
        Self::sample()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
