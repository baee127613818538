mod engine;
mod question;

pub use engine::{
    points_for_correct, time_bonus, QuestionView, QuizEngine, QuizResult, QuizState, Session,
    BASE_POINTS, TIME_BONUS_DIVISOR,
};
pub use question::{Question, QuestionSet, OPTION_COUNT};
