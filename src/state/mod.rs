pub mod library;
pub mod reading_session;

pub use library::Library;
pub use reading_session::{BookWorkspace, ChatTurn, ReadingSession, SaveOutcome, ToggleOutcome};
