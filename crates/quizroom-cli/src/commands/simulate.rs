//! Deterministic quiz runs driven by a script instead of a keyboard and a
//! wall clock.
//!
//! A run is `NAME:SCRIPT`, where SCRIPT has one comma-separated token per
//! question:
//!
//! - `N@T`: wait `T` ticks, then answer option `N` (1-based)
//! - `N`: answer option `N` immediately
//! - `-`: let the countdown run out
//!
//! Questions without a token time out.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use quizroom_core::quiz::OPTION_COUNT;
use quizroom_core::{Config, Event, Phase, SessionController};
use tracing::{debug, warn};

use super::resolve_questions;
use crate::render;

#[derive(Args)]
pub struct SimulateArgs {
    /// One scripted run, e.g. "Bo:3@5,-,2" (repeatable)
    #[arg(long = "run", value_name = "NAME:SCRIPT", required = true)]
    runs: Vec<RunScript>,
    /// Questions file (defaults to the configured set)
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Print the leaderboard as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Answer { option: usize, after_ticks: u32 },
    Timeout,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        if token == "-" {
            return Ok(Step::Timeout);
        }
        let (option, after_ticks) = match token.split_once('@') {
            Some((option, ticks)) => (
                option,
                ticks
                    .parse::<u32>()
                    .map_err(|_| format!("invalid tick count in '{token}'"))?,
            ),
            None => (token, 0),
        };
        let option = option
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=OPTION_COUNT).contains(n))
            .ok_or_else(|| format!("option in '{token}' must be 1-{OPTION_COUNT}"))?;
        Ok(Step::Answer {
            option: option - 1,
            after_ticks,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunScript {
    name: String,
    steps: Vec<Step>,
}

impl FromStr for RunScript {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, script) = s
            .split_once(':')
            .ok_or_else(|| format!("expected NAME:SCRIPT, got '{s}'"))?;
        let steps = if script.trim().is_empty() {
            Vec::new()
        } else {
            script
                .split(',')
                .map(str::parse)
                .collect::<Result<Vec<Step>, _>>()?
        };
        Ok(Self {
            name: name.to_string(),
            steps,
        })
    }
}

fn active_question(controller: &SessionController) -> Option<usize> {
    controller.engine().map(|engine| engine.question_index())
}

/// Play one scripted run to completion and return every event it produced.
pub fn play_script(
    controller: &mut SessionController,
    script: &RunScript,
) -> Result<Vec<Event>, Box<dyn std::error::Error>> {
    let mut events = controller.submit_name(&script.name)?;

    'steps: for step in &script.steps {
        let Some(index) = active_question(controller) else {
            warn!(name = %script.name, "script has more steps than questions");
            break;
        };
        match *step {
            Step::Answer {
                option,
                after_ticks,
            } => {
                for _ in 0..after_ticks {
                    events.extend(controller.tick());
                    if active_question(controller) != Some(index) {
                        debug!(index, "question timed out before scripted answer");
                        continue 'steps;
                    }
                }
                events.extend(controller.submit_answer(option));
            }
            Step::Timeout => {
                while active_question(controller) == Some(index) {
                    events.extend(controller.tick());
                }
            }
        }
    }

    while controller.phase() == Phase::Quiz {
        events.extend(controller.tick());
    }
    Ok(events)
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let questions = resolve_questions(args.questions.as_deref(), &config)?;
    let mut controller = SessionController::new(questions);

    for script in &args.runs {
        let events = play_script(&mut controller, script)?;
        debug!(name = %script.name, events = events.len(), "scripted run finished");
        controller.restart();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(controller.leaderboard())?);
    } else {
        print!(
            "{}",
            render::leaderboard(controller.leaderboard(), &config.display.date_format)
        );
    }
    Ok(())
}
