//! Quiz engine implementation.
//!
//! The quiz engine is a tick-driven state machine. It never reads a clock
//! and owns no timer; the caller is responsible for calling `tick()` once per
//! second while a question is active.
//!
//! ## State Transitions
//!
//! ```text
//! Active(0) -> Active(1) -> ... -> Active(N-1) -> Finished
//! ```
//!
//! Each step is taken exactly once per question, either by `submit_answer()`
//! or by the tick that runs the countdown out.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = QuizEngine::new(QuestionSet::sample());
//! // Once per second:
//! engine.tick();
//! // On user input:
//! engine.submit_answer(2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::question::{Question, QuestionSet, OPTION_COUNT};
use crate::events::Event;

/// Points for any correct answer before the time bonus.
pub const BASE_POINTS: u32 = 100;
/// Remaining seconds are divided by this to get the time bonus.
pub const TIME_BONUS_DIVISOR: u32 = 2;

/// Bonus for answering with `remaining_secs` left on the countdown.
pub fn time_bonus(remaining_secs: u32) -> u32 {
    remaining_secs / TIME_BONUS_DIVISOR
}

/// Points for a correct answer with `remaining_secs` left.
pub fn points_for_correct(remaining_secs: u32) -> u32 {
    BASE_POINTS + time_bonus(remaining_secs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "lowercase")]
pub enum QuizState {
    /// Question at this index is on screen.
    Active(usize),
    Finished,
}

/// Mutable progress of one run through the question set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Equals the question count once finished.
    pub question_index: usize,
    pub score: u32,
    /// Number of ticks observed.
    pub elapsed_secs: u32,
    pub remaining_secs: u32,
}

/// Final (score, elapsed) pair handed to the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub elapsed_secs: u32,
}

/// What the presentation layer needs to draw the active question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub question_index: usize,
    pub question_count: usize,
    pub question: &'a Question,
    pub remaining_secs: u32,
    pub score: u32,
}

impl QuestionView<'_> {
    /// 1-based position, as shown to the player.
    pub fn number(&self) -> usize {
        self.question_index + 1
    }

    /// 1.0 with a full countdown, 0.0 when it has run out.
    pub fn countdown_ratio(&self) -> f64 {
        let limit = self.question.time_limit_secs;
        if limit == 0 {
            return 0.0;
        }
        f64::from(self.remaining_secs) / f64::from(limit)
    }
}

/// Core quiz engine.
///
/// Owns the question set and the [`Session`] for a single run. Discarded
/// once the run finishes; a new run gets a new engine.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    questions: QuestionSet,
    session: Session,
}

impl QuizEngine {
    /// Create an engine positioned on the first question.
    pub fn new(questions: QuestionSet) -> Self {
        let remaining_secs = questions.get(0).map(|q| q.time_limit_secs).unwrap_or(0);
        Self {
            questions,
            session: Session {
                remaining_secs,
                ..Session::default()
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> QuizState {
        if self.session.question_index < self.questions.len() {
            QuizState::Active(self.session.question_index)
        } else {
            QuizState::Finished
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state() == QuizState::Finished
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn question_index(&self) -> usize {
        self.session.question_index
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.session.elapsed_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.session.remaining_secs
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.session.question_index)
    }

    /// `Some` only once finished.
    pub fn result(&self) -> Option<QuizResult> {
        self.is_finished().then_some(QuizResult {
            score: self.session.score,
            elapsed_secs: self.session.elapsed_secs,
        })
    }

    pub fn view(&self) -> Option<QuestionView<'_>> {
        let question = self.current_question()?;
        Some(QuestionView {
            question_index: self.session.question_index,
            question_count: self.questions.len(),
            question,
            remaining_secs: self.session.remaining_secs,
            score: self.session.score,
        })
    }

    /// Event announcing the active question, if any.
    pub fn presented(&self) -> Option<Event> {
        let question = self.current_question()?;
        Some(Event::QuestionPresented {
            question_index: self.session.question_index,
            question_id: question.id,
            time_limit_secs: question.time_limit_secs,
        })
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            question_index: self.session.question_index,
            question_count: self.questions.len(),
            remaining_secs: self.session.remaining_secs,
            time_limit_secs: self
                .current_question()
                .map(|q| q.time_limit_secs)
                .unwrap_or(0),
            score: self.session.score,
            elapsed_secs: self.session.elapsed_secs,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance the countdown by one second.
    ///
    /// A tick that arrives with one second or less remaining is the timeout:
    /// the question scores nothing and the next one is presented. Ignored
    /// once finished.
    pub fn tick(&mut self) -> Vec<Event> {
        let question_index = self.session.question_index;
        let Some(question_id) = self.current_question().map(|q| q.id) else {
            warn!("tick ignored: quiz already finished");
            return Vec::new();
        };

        self.session.elapsed_secs = self.session.elapsed_secs.saturating_add(1);

        if self.session.remaining_secs <= 1 {
            self.session.remaining_secs = 0;
            debug!(question_index, question_id, "question timed out");
            let mut events = vec![Event::QuestionTimedOut {
                question_index,
                question_id,
            }];
            self.advance(&mut events);
            return events;
        }

        self.session.remaining_secs -= 1;
        vec![Event::CountdownTicked {
            question_index,
            remaining_secs: self.session.remaining_secs,
            elapsed_secs: self.session.elapsed_secs,
        }]
    }

    /// Answer the active question with a 0-based option index.
    ///
    /// Returns no events (and changes nothing) when finished or when
    /// `selected` is not one of the question's options.
    pub fn submit_answer(&mut self, selected: usize) -> Vec<Event> {
        let question_index = self.session.question_index;
        let Some(question) = self.questions.get(question_index) else {
            warn!(selected, "answer ignored: quiz already finished");
            return Vec::new();
        };
        if selected >= OPTION_COUNT {
            warn!(selected, "answer ignored: option index out of range");
            return Vec::new();
        }

        let question_id = question.id;
        let correct_answer = question.correct_answer;
        let mut events = Vec::with_capacity(2);

        if question.is_correct(selected) {
            let bonus = time_bonus(self.session.remaining_secs);
            let points = BASE_POINTS + bonus;
            self.session.score = self.session.score.saturating_add(points);
            debug!(question_index, points, bonus, "correct answer");
            events.push(Event::AnswerCorrect {
                question_index,
                question_id,
                points_awarded: points,
                time_bonus: bonus,
            });
        } else {
            debug!(question_index, selected, correct_answer, "incorrect answer");
            events.push(Event::AnswerIncorrect {
                question_index,
                question_id,
                selected,
                correct_answer,
            });
        }

        self.advance(&mut events);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, events: &mut Vec<Event>) {
        self.session.question_index += 1;
        match self.questions.get(self.session.question_index) {
            Some(next) => {
                self.session.remaining_secs = next.time_limit_secs;
                events.push(Event::QuestionPresented {
                    question_index: self.session.question_index,
                    question_id: next.id,
                    time_limit_secs: next.time_limit_secs,
                });
            }
            None => {
                self.session.remaining_secs = 0;
                info!(
                    score = self.session.score,
                    elapsed_secs = self.session.elapsed_secs,
                    "quiz finished"
                );
                events.push(Event::QuizFinished {
                    score: self.session.score,
                    elapsed_secs: self.session.elapsed_secs,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_questions(limit: u32) -> QuizEngine {
        QuizEngine::new(
            QuestionSet::new(vec![
                Question::new(1, "Capital of France?", ["London", "Berlin", "Paris", "Madrid"], 2, limit),
                Question::new(2, "Red Planet?", ["Venus", "Mars", "Jupiter", "Saturn"], 1, limit),
            ])
            .unwrap(),
        )
    }

    fn tick_n(engine: &mut QuizEngine, n: u32) -> Vec<Event> {
        (0..n).flat_map(|_| engine.tick()).collect()
    }

    #[test]
    fn starts_on_first_question_with_full_countdown() {
        let engine = two_questions(30);
        assert_eq!(engine.state(), QuizState::Active(0));
        assert_eq!(engine.remaining_secs(), 30);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.elapsed_secs(), 0);
        assert!(engine.result().is_none());
        assert!(matches!(
            engine.presented(),
            Some(Event::QuestionPresented { question_index: 0, question_id: 1, time_limit_secs: 30 })
        ));
    }

    #[test]
    fn correct_answer_awards_base_plus_half_remaining() {
        let mut engine = two_questions(30);
        tick_n(&mut engine, 5);
        assert_eq!(engine.remaining_secs(), 25);

        let events = engine.submit_answer(2);
        assert_eq!(engine.score(), 112);
        assert_eq!(
            events[0],
            Event::AnswerCorrect { question_index: 0, question_id: 1, points_awarded: 112, time_bonus: 12 }
        );
        assert!(matches!(events[1], Event::QuestionPresented { question_index: 1, .. }));
        assert_eq!(engine.state(), QuizState::Active(1));
        assert_eq!(engine.remaining_secs(), 30);
    }

    #[test]
    fn incorrect_answer_awards_nothing_and_advances() {
        let mut engine = two_questions(30);
        let events = engine.submit_answer(0);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.question_index(), 1);
        assert_eq!(
            events[0],
            Event::AnswerIncorrect { question_index: 0, question_id: 1, selected: 0, correct_answer: 2 }
        );
        assert_eq!(events[0].notification().unwrap().description(), "No points awarded");
    }

    #[test]
    fn timeout_fires_on_the_tick_that_exhausts_the_countdown() {
        let mut engine = two_questions(3);
        let events = tick_n(&mut engine, 2);
        assert_eq!(engine.remaining_secs(), 1);
        assert!(events.iter().all(|e| matches!(e, Event::CountdownTicked { .. })));

        let events = engine.tick();
        assert_eq!(
            events[0],
            Event::QuestionTimedOut { question_index: 0, question_id: 1 }
        );
        assert_eq!(engine.state(), QuizState::Active(1));
        assert_eq!(engine.remaining_secs(), 3);
        assert_eq!(engine.elapsed_secs(), 3);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn last_answer_counts_towards_final_result() {
        let mut engine = two_questions(30);
        engine.submit_answer(2);
        tick_n(&mut engine, 10);
        let events = engine.submit_answer(1);

        assert!(engine.is_finished());
        assert_eq!(engine.score(), 115 + 110);
        assert_eq!(
            events.last(),
            Some(&Event::QuizFinished { score: 225, elapsed_secs: 10 })
        );
        assert_eq!(engine.result(), Some(QuizResult { score: 225, elapsed_secs: 10 }));
    }

    #[test]
    fn answers_and_ticks_after_finish_are_ignored() {
        let mut engine = two_questions(30);
        engine.submit_answer(0);
        engine.submit_answer(0);
        assert!(engine.is_finished());

        let before = *engine.session();
        assert!(engine.tick().is_empty());
        assert!(engine.submit_answer(1).is_empty());
        assert_eq!(*engine.session(), before);
        assert!(engine.view().is_none());
        assert!(engine.presented().is_none());
    }

    #[test]
    fn out_of_range_option_is_ignored() {
        let mut engine = two_questions(30);
        assert!(engine.submit_answer(4).is_empty());
        assert_eq!(engine.state(), QuizState::Active(0));
    }

    #[test]
    fn two_question_scenario_correct_then_timeout() {
        let mut engine = two_questions(30);
        engine.submit_answer(2);
        assert_eq!(engine.score(), 115);

        let events = tick_n(&mut engine, 30);
        assert!(events.contains(&Event::QuestionTimedOut { question_index: 1, question_id: 2 }));
        assert_eq!(engine.result(), Some(QuizResult { score: 115, elapsed_secs: 30 }));
    }

    #[test]
    fn view_reports_countdown_ratio() {
        let mut engine = two_questions(10);
        tick_n(&mut engine, 5);
        let view = engine.view().unwrap();
        assert_eq!(view.number(), 1);
        assert_eq!(view.question_count, 2);
        assert!((view.countdown_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_reflects_session() {
        let mut engine = two_questions(20);
        engine.submit_answer(2);
        engine.tick();
        match engine.snapshot() {
            Event::StateSnapshot { state, score, remaining_secs, elapsed_secs, time_limit_secs, .. } => {
                assert_eq!(state, QuizState::Active(1));
                assert_eq!(score, 110);
                assert_eq!(remaining_secs, 19);
                assert_eq!(elapsed_secs, 1);
                assert_eq!(time_limit_secs, 20);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn answer_advances_exactly_one_question(selected in 0usize..OPTION_COUNT, ticks in 0u32..29) {
            let mut engine = two_questions(30);
            tick_n(&mut engine, ticks);
            engine.submit_answer(selected);
            prop_assert_eq!(engine.question_index(), 1);
            engine.submit_answer(selected);
            prop_assert!(engine.is_finished());
        }

        #[test]
        fn scoring_follows_remaining_time(ticks in 0u32..29, selected in 0usize..OPTION_COUNT) {
            let mut engine = two_questions(30);
            tick_n(&mut engine, ticks);
            let remaining = engine.remaining_secs();
            engine.submit_answer(selected);
            let expected = if selected == 2 { 100 + remaining / 2 } else { 0 };
            prop_assert_eq!(engine.score(), expected);
        }

        #[test]
        fn timeout_matches_wrong_answer_at_zero(limit in 1u32..40) {
            let mut timed_out = two_questions(limit);
            tick_n(&mut timed_out, limit);

            let mut answered = two_questions(limit);
            tick_n(&mut answered, limit - 1);
            answered.submit_answer(0);

            prop_assert_eq!(timed_out.question_index(), answered.question_index());
            prop_assert_eq!(timed_out.score(), answered.score());
            prop_assert_eq!(timed_out.remaining_secs(), answered.remaining_secs());
        }

        #[test]
        fn elapsed_equals_ticks_observed(script in proptest::collection::vec(prop_oneof![Just(None), (0usize..OPTION_COUNT).prop_map(Some)], 0..80)) {
            let mut engine = two_questions(5);
            let mut accepted_ticks = 0u32;
            for step in script {
                match step {
                    None => {
                        if !engine.tick().is_empty() {
                            accepted_ticks += 1;
                        }
                    }
                    Some(option) => {
                        engine.submit_answer(option);
                    }
                }
                prop_assert!(engine.question_index() <= engine.question_count());
            }
            prop_assert_eq!(engine.elapsed_secs(), accepted_ticks);
        }
    }
}
