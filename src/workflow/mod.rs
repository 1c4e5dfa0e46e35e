pub mod book_flow;

pub use book_flow::{
    active_quiz, pick_answer, start_quiz_from_text, submit_quiz, BookFlow, QuizReport,
};
