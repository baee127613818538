//! Plain-text rendering of quiz state for the terminal.

use std::fmt::Write as _;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use quizroom_core::{Event, Leaderboard, Medal, QuestionSet, QuestionView};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn welcome(questions: &QuestionSet) -> String {
    format!(
        "Welcome to Quizroom!\n{} questions, answer fast for a time bonus.\n",
        questions.len()
    )
}

pub fn question(view: &QuestionView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuestion {} of {}    Score: {}",
        view.number(),
        view.question_count,
        view.score
    );
    let _ = writeln!(out, "{}", view.question.question);
    for (label, option) in OPTION_LABELS.iter().zip(&view.question.options) {
        let _ = writeln!(out, "  {label}) {option}");
    }
    out
}

/// Single-line countdown bar, redrawn in place with `\r`.
pub fn countdown(view: &QuestionView<'_>) -> String {
    const WIDTH: usize = 20;
    let filled = ((view.countdown_ratio().clamp(0.0, 1.0) * WIDTH as f64) as usize).min(WIDTH);
    format!(
        "\r[{}{}] {:>3}s ",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        view.remaining_secs
    )
}

fn correct_option(questions: &QuestionSet, question_index: usize) -> Option<&str> {
    questions.get(question_index)?.correct_option()
}

/// Human-readable line for events the player should see.
pub fn event_line(event: &Event, questions: &QuestionSet) -> Option<String> {
    if let Some(note) = event.notification() {
        let mut line = format!("\n{} {}", note.title(), note.description());
        if let Event::AnswerIncorrect { question_index, .. } = event {
            if let Some(answer) = correct_option(questions, *question_index) {
                let _ = write!(line, " (answer: {answer})");
            }
        }
        return Some(line);
    }
    match event {
        Event::QuizStarted {
            player,
            question_count,
        } => Some(format!("Good luck, {player}! {question_count} questions ahead.")),
        Event::QuestionTimedOut { question_index, .. } => Some(
            match correct_option(questions, *question_index) {
                Some(answer) => format!("\nTime's up! No points awarded (answer: {answer})"),
                None => "\nTime's up! No points awarded".to_string(),
            },
        ),
        Event::QuizFinished {
            score,
            elapsed_secs,
        } => Some(format!("\nQuiz complete: {score} points in {elapsed_secs}s")),
        Event::LeaderboardUpdated { rank, .. } => Some(match Medal::for_rank(*rank) {
            Some(medal) => format!("You placed #{rank} ({} medal)", medal.label()),
            None => format!("You placed #{rank}"),
        }),
        Event::StateSnapshot {
            question_index,
            question_count,
            score,
            ..
        } => Some(format!(
            "\nStopped at question {} of {question_count} with {score} points",
            (*question_index + 1).min(*question_count)
        )),
        _ => None,
    }
}

fn medal_icon(medal: Option<Medal>) -> &'static str {
    match medal {
        Some(Medal::Gold) => "🥇",
        Some(Medal::Silver) => "🥈",
        Some(Medal::Bronze) => "🥉",
        None => "  ",
    }
}

pub fn leaderboard(board: &Leaderboard, date_format: &str) -> String {
    if board.is_empty() {
        return "No scores yet. Be the first to play!\n".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Rank", "Name", "Score", "Time", "Date", "Id"]);
    for ranked in board.ranked() {
        let entry = ranked.entry;
        table.add_row(vec![
            Cell::new(format!("{} #{}", medal_icon(ranked.medal), ranked.rank)),
            Cell::new(&entry.name),
            Cell::new(entry.score),
            Cell::new(format!("{}s", entry.elapsed_secs)),
            Cell::new(entry.formatted_date(date_format)),
            // First block of the UUID
            Cell::new(entry.id.to_string().chars().take(8).collect::<String>()),
        ]);
    }
    format!("Leaderboard\n{table}\n")
}

pub fn question_list(questions: &QuestionSet) -> String {
    let mut out = String::new();
    for (i, q) in questions.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. [id {}] {} ({}s)", i + 1, q.id, q.question, q.time_limit_secs);
        for (j, (label, option)) in OPTION_LABELS.iter().zip(&q.options).enumerate() {
            let marker = if q.is_correct(j) { "*" } else { " " };
            let _ = writeln!(out, "     {marker}{label}) {option}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quizroom_core::{LeaderboardEntry, Question, QuizEngine, QuizResult};

    #[test]
    fn question_lists_lettered_options() {
        let engine = QuizEngine::new(QuestionSet::sample());
        let text = question(&engine.view().unwrap());
        assert!(text.contains("Question 1 of 10"));
        assert!(text.contains("What is the capital of France?"));
        assert!(text.contains("C) Paris"));
    }

    fn view_of(question: &Question, remaining_secs: u32) -> QuestionView<'_> {
        QuestionView {
            question_index: 0,
            question_count: 1,
            question,
            remaining_secs,
            score: 0,
        }
    }

    #[test]
    fn countdown_bar_scales_with_remaining_time() {
        let q = Question::new(1, "q", ["a", "b", "c", "d"], 0, 30);
        assert_eq!(countdown(&view_of(&q, 30)), format!("\r[{}]  30s ", "#".repeat(20)));
        assert_eq!(
            countdown(&view_of(&q, 15)),
            format!("\r[{}{}]  15s ", "#".repeat(10), "-".repeat(10))
        );
        assert_eq!(countdown(&view_of(&q, 0)), format!("\r[{}]   0s ", "-".repeat(20)));
    }

    #[test]
    fn countdown_handles_huge_time_limits() {
        let q = Question::new(1, "q", ["a", "b", "c", "d"], 0, 4_000_000_000);
        let full = countdown(&view_of(&q, 4_000_000_000));
        assert!(full.contains(&"#".repeat(20)));
        let half = countdown(&view_of(&q, 2_000_000_000));
        assert!(half.starts_with(&format!("\r[{}{}]", "#".repeat(10), "-".repeat(10))));
    }

    #[test]
    fn correct_answer_line_shows_bonus() {
        let questions = QuestionSet::sample();
        let line = event_line(
            &Event::AnswerCorrect {
                question_index: 0,
                question_id: 1,
                points_awarded: 114,
                time_bonus: 14,
            },
            &questions,
        )
        .unwrap();
        assert!(line.contains("+114 points (including 14 time bonus)"));
        assert!(event_line(&Event::SessionRestarted, &questions).is_none());
    }

    #[test]
    fn missed_questions_reveal_the_answer() {
        let questions = QuestionSet::sample();
        let wrong = event_line(
            &Event::AnswerIncorrect {
                question_index: 0,
                question_id: 1,
                selected: 0,
                correct_answer: 2,
            },
            &questions,
        )
        .unwrap();
        assert!(wrong.contains("No points awarded (answer: Paris)"));

        let timed_out = event_line(
            &Event::QuestionTimedOut {
                question_index: 1,
                question_id: 2,
            },
            &questions,
        )
        .unwrap();
        assert!(timed_out.contains("(answer: Mars)"));
    }

    #[test]
    fn podium_placement_names_the_medal() {
        let questions = QuestionSet::sample();
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let entry = LeaderboardEntry::new("Bo", QuizResult { score: 100, elapsed_secs: 9 }, date);
        let placed = |rank| {
            event_line(
                &Event::LeaderboardUpdated {
                    entry_id: entry.id,
                    player: "Bo".into(),
                    score: 100,
                    rank,
                },
                &questions,
            )
            .unwrap()
        };
        assert_eq!(placed(1), "You placed #1 (gold medal)");
        assert_eq!(placed(3), "You placed #3 (bronze medal)");
        assert_eq!(placed(4), "You placed #4");
    }

    #[test]
    fn snapshot_line_summarises_progress() {
        let engine = QuizEngine::new(QuestionSet::sample());
        let line = event_line(&engine.snapshot(), engine.questions()).unwrap();
        assert!(line.contains("Stopped at question 1 of 10 with 0 points"));
    }

    #[test]
    fn empty_leaderboard_invites_first_player() {
        assert!(leaderboard(&Leaderboard::new(), "%Y-%m-%d").contains("Be the first"));
    }

    #[test]
    fn leaderboard_table_lists_ranked_entries() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let mut board = Leaderboard::new();
        board.add(LeaderboardEntry::new("Ann", QuizResult { score: 200, elapsed_secs: 40 }, date));
        board.add(LeaderboardEntry::new("Bo", QuizResult { score: 350, elapsed_secs: 25 }, date));

        let text = leaderboard(&board, "%d.%m.%Y");
        let bo = text.find("Bo").unwrap();
        let ann = text.find("Ann").unwrap();
        assert!(bo < ann);
        assert!(text.contains("02.01.2024"));
        assert!(text.contains("25s"));
    }

    #[test]
    fn question_list_marks_correct_option() {
        let text = question_list(&QuestionSet::sample());
        assert!(text.contains("*C) Paris"));
        assert!(text.contains(" A) London"));
    }
}
