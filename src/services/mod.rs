pub mod book_assistant;
pub mod llm_service;
pub mod quiz_parser;

pub use book_assistant::{BookAssistant, Language};
pub use llm_service::{ChatModel, LlmService};
pub use quiz_parser::parse_quiz;
