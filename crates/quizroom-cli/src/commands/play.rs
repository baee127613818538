use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use quizroom_core::storage::DisplayConfig;
use quizroom_core::{Config, Event, Phase, QuestionSet, SessionController};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{self, Instant, MissedTickBehavior};

use super::resolve_questions;
use crate::render;

type Input = Lines<BufReader<Stdin>>;

#[derive(Args)]
pub struct PlayArgs {
    /// Questions file (defaults to the configured set)
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Override the countdown tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,
}

/// What the player typed while a question was on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Answer(usize),
    Quit,
    Invalid,
}

/// Accepts `1`-`4`, `a`-`d` (any case), or `q`/`quit`.
fn parse_choice(input: &str) -> Choice {
    let input = input.trim().to_ascii_lowercase();
    match input.as_str() {
        "q" | "quit" => Choice::Quit,
        "1" | "a" => Choice::Answer(0),
        "2" | "b" => Choice::Answer(1),
        "3" | "c" => Choice::Answer(2),
        "4" | "d" => Choice::Answer(3),
        _ => Choice::Invalid,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let questions = resolve_questions(args.questions.as_deref(), &config)?;
    let tick_ms = args.tick_ms.unwrap_or(config.display.tick_ms);
    if tick_ms == 0 {
        return Err("tick interval must be greater than zero".into());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(play_loop(
        SessionController::new(questions),
        Duration::from_millis(tick_ms),
        &config.display,
    ));
    // A stdin read may still be parked on the blocking pool.
    runtime.shutdown_background();
    result
}

fn prompt(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()
}

fn print_events(events: &[Event], questions: &QuestionSet) {
    for line in events.iter().filter_map(|e| render::event_line(e, questions)) {
        println!("{line}");
    }
}

async fn play_loop(
    mut controller: SessionController,
    period: Duration,
    display: &DisplayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input: Input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match controller.phase() {
            Phase::Welcome => {
                print!("{}", render::welcome(controller.questions()));
                prompt("Your name: ")?;
                let Some(line) = input.next_line().await? else {
                    return Ok(());
                };
                match controller.submit_name(&line) {
                    Ok(events) => print_events(&events, controller.questions()),
                    Err(e) => println!("Invalid Name: {e}"),
                }
            }
            Phase::Quiz => {
                if run_quiz(&mut controller, &mut input, period, display).await? == Flow::Quit {
                    return Ok(());
                }
            }
            Phase::Leaderboard => {
                print!(
                    "{}",
                    render::leaderboard(controller.leaderboard(), &display.date_format)
                );
                prompt("Play again? [y/N] ")?;
                match input.next_line().await? {
                    Some(line) if line.trim().eq_ignore_ascii_case("y") => {
                        controller.restart();
                    }
                    _ => return Ok(()),
                }
            }
        }
    }
}

fn draw_question(controller: &SessionController, display: &DisplayConfig) -> std::io::Result<()> {
    let Some(view) = controller.engine().and_then(|engine| engine.view()) else {
        return Ok(());
    };
    print!("{}", render::question(&view));
    draw_countdown(controller, display)
}

fn draw_countdown(controller: &SessionController, display: &DisplayConfig) -> std::io::Result<()> {
    match controller.engine().and_then(|engine| engine.view()) {
        Some(view) if display.show_timer => prompt(&render::countdown(&view)),
        _ => Ok(()),
    }
}

/// Leave the quiz early, summarising where the player stopped.
fn quit_quiz(controller: &SessionController) -> Flow {
    if let Some(engine) = controller.engine() {
        print_events(&[engine.snapshot()], controller.questions());
    }
    Flow::Quit
}

async fn run_quiz(
    controller: &mut SessionController,
    input: &mut Input,
    period: Duration,
    display: &DisplayConfig,
) -> Result<Flow, Box<dyn std::error::Error>> {
    // First tick lands one full period after the question appears.
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    draw_question(controller, display)?;

    while controller.phase() == Phase::Quiz {
        let events = tokio::select! {
            _ = ticker.tick() => controller.tick(),
            line = input.next_line() => {
                let Some(line) = line? else {
                    return Ok(quit_quiz(controller));
                };
                match parse_choice(&line) {
                    Choice::Answer(index) => controller.submit_answer(index),
                    Choice::Quit => return Ok(quit_quiz(controller)),
                    Choice::Invalid => {
                        println!("Choose 1-4 or a-d (q to quit)");
                        continue;
                    }
                }
            }
        };

        if events
            .iter()
            .any(|e| matches!(e, Event::CountdownTicked { .. }))
        {
            draw_countdown(controller, display)?;
        }
        print_events(&events, controller.questions());

        if events
            .iter()
            .any(|e| matches!(e, Event::QuestionPresented { .. }))
        {
            ticker.reset();
            draw_question(controller, display)?;
        }
    }
    Ok(Flow::Continue)
}
