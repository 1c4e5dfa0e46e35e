pub mod book;
pub mod loaders;
pub mod quiz;

pub use book::{Book, BookId, NewBook};
pub use loaders::{load_library, parse_library};
pub use quiz::{Difficulty, ParsedQuestion, QuizRequest, QuizSession};
