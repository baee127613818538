use std::path::PathBuf;

use clap::Subcommand;
use quizroom_core::{Config, QuestionSet};

use super::resolve_questions;
use crate::render;

#[derive(Subcommand)]
pub enum QuestionsAction {
    /// List the questions a new session would use
    List {
        /// Questions file (defaults to the configured set)
        #[arg(long)]
        questions: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a questions file without playing it
    Validate {
        /// Questions file
        path: PathBuf,
    },
    /// Print the built-in question set as TOML
    Export,
}

pub fn run(action: QuestionsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        QuestionsAction::List { questions, json } => {
            let config = Config::load_or_default();
            let set = resolve_questions(questions.as_deref(), &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                print!("{}", render::question_list(&set));
            }
        }
        QuestionsAction::Validate { path } => {
            let set = QuestionSet::load(&path)?;
            println!(
                "ok: {} questions, {}s total, max score {}",
                set.len(),
                set.total_time_limit_secs(),
                set.max_score()
            );
        }
        QuestionsAction::Export => {
            print!("{}", QuestionSet::sample().to_toml_string()?);
        }
    }
    Ok(())
}
