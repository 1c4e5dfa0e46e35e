//! 阅读会话状态
//!
//! 一个用户会话的全部状态：书库、书架、当前打开的书和每本书的工作区。
//! 会话创建时初始化，结束时整体丢弃，不做持久化。

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::error::{AppError, AppResult, LibraryError};
use crate::models::book::{Book, BookId};
use crate::models::quiz::QuizSession;
use crate::state::library::Library;

/// 最近对话展示条数
pub const RECENT_CHAT_LIMIT: usize = 6;

/// 一次问答
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Local>,
}

/// 单本书的 AI 工作区
#[derive(Debug, Clone, Default)]
pub struct BookWorkspace {
    pub summary: Option<String>,
    pub keywords: Option<String>,
    pub translation: Option<String>,
    pub chat_history: Vec<ChatTurn>,
    /// 模型生成的原始测验
    pub quiz_raw: Option<String>,
    /// 正在进行的测验，每次开始都会替换
    pub quiz: Option<QuizSession>,
}

impl BookWorkspace {
    pub fn push_chat(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.chat_history.push(ChatTurn {
            question: question.into(),
            answer: answer.into(),
            asked_at: Local::now(),
        });
    }

    /// 最近几轮对话，最新的在前
    pub fn recent_chat(&self) -> impl Iterator<Item = &ChatTurn> {
        let start = self.chat_history.len().saturating_sub(RECENT_CHAT_LIMIT);
        self.chat_history[start..].iter().rev()
    }
}

/// 加入书架的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// 切换书架的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// 阅读会话
#[derive(Debug, Default)]
pub struct ReadingSession {
    pub library: Library,
    my_books: Vec<BookId>,
    selected: Option<BookId>,
    workspaces: HashMap<BookId, BookWorkspace>,
}

impl ReadingSession {
    pub fn new(library: Library) -> Self {
        Self {
            library,
            ..Default::default()
        }
    }

    // ========== 书架 ==========

    /// 书架上的书，按加入顺序；已被移出书库的书会被跳过
    pub fn my_books(&self) -> Vec<&Book> {
        self.my_books
            .iter()
            .filter_map(|id| self.library.find(*id))
            .collect()
    }

    pub fn is_saved(&self, id: BookId) -> bool {
        self.my_books.contains(&id)
    }

    pub fn save_to_my_books(&mut self, id: BookId) -> AppResult<SaveOutcome> {
        self.require_book(id)?;
        if self.is_saved(id) {
            return Ok(SaveOutcome::AlreadySaved);
        }
        self.my_books.push(id);
        Ok(SaveOutcome::Saved)
    }

    /// 移出书架，返回是否确实移除了
    pub fn remove_from_my_books(&mut self, id: BookId) -> bool {
        let before = self.my_books.len();
        self.my_books.retain(|b| *b != id);
        self.my_books.len() != before
    }

    pub fn toggle_my_books(&mut self, id: BookId) -> AppResult<ToggleOutcome> {
        if self.remove_from_my_books(id) {
            return Ok(ToggleOutcome::Removed);
        }
        self.save_to_my_books(id)?;
        Ok(ToggleOutcome::Added)
    }

    // ========== 当前书籍 ==========

    pub fn open(&mut self, id: BookId) -> AppResult<&Book> {
        self.require_book(id)?;
        self.selected = Some(id);
        self.require_book(id)
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> AppResult<BookId> {
        self.selected
            .ok_or(AppError::Library(LibraryError::NoBookSelected))
    }

    pub fn selected_book(&self) -> AppResult<&Book> {
        let id = self.selected_id()?;
        self.require_book(id)
    }

    /// 保存编辑后的正文
    pub fn save_content(&mut self, id: BookId, content: impl Into<String>) -> AppResult<()> {
        let book = self
            .library
            .find_mut(id)
            .ok_or_else(|| AppError::book_not_found(id))?;
        book.content = content.into();
        Ok(())
    }

    // ========== 工作区 ==========

    pub fn workspace(&self, id: BookId) -> Option<&BookWorkspace> {
        self.workspaces.get(&id)
    }

    pub fn workspace_mut(&mut self, id: BookId) -> &mut BookWorkspace {
        self.workspaces.entry(id).or_default()
    }

    fn require_book(&self, id: BookId) -> AppResult<&Book> {
        self.library
            .find(id)
            .ok_or_else(|| AppError::book_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> (ReadingSession, BookId, BookId) {
        let session = ReadingSession::new(Library::with_samples());
        let first = session.library.books[0].id;
        let second = session.library.books[1].id;
        (session, first, second)
    }

    #[test]
    fn test_save_has_no_duplicates() {
        let (mut session, first, second) = session();
        assert_eq!(session.save_to_my_books(first).unwrap(), SaveOutcome::Saved);
        assert_eq!(
            session.save_to_my_books(first).unwrap(),
            SaveOutcome::AlreadySaved
        );
        session.save_to_my_books(second).unwrap();

        let titles: Vec<_> = session.my_books().iter().map(|b| b.title.clone()).collect();
        assert_eq!(titles, vec!["Atomic Habits", "The Alchemist"]);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let (mut session, first, _) = session();
        assert_eq!(session.toggle_my_books(first).unwrap(), ToggleOutcome::Added);
        assert_eq!(session.toggle_my_books(first).unwrap(), ToggleOutcome::Removed);
        assert!(session.my_books().is_empty());
        assert!(!session.remove_from_my_books(first));
    }

    #[test]
    fn test_unknown_book_is_rejected() {
        let (mut session, _, _) = session();
        let unknown = BookId::new();
        assert!(matches!(
            session.open(unknown),
            Err(AppError::Library(LibraryError::BookNotFound { .. }))
        ));
        assert!(session.save_to_my_books(unknown).is_err());
        assert!(session.save_content(unknown, "text").is_err());
    }

    #[test]
    fn test_open_close_and_save_content() {
        let (mut session, first, _) = session();
        assert!(session.selected_book().is_err());

        session.open(first).unwrap();
        session.save_content(first, "Habits compound.").unwrap();
        assert_eq!(session.selected_book().unwrap().content, "Habits compound.");

        session.close();
        assert!(matches!(
            session.selected_id(),
            Err(AppError::Library(LibraryError::NoBookSelected))
        ));
    }

    #[test]
    fn test_workspaces_are_per_book() {
        let (mut session, first, second) = session();
        session.workspace_mut(first).summary = Some("short".to_string());
        assert!(session.workspace(second).is_none());
        assert_eq!(
            session.workspace(first).and_then(|w| w.summary.as_deref()),
            Some("short")
        );
    }

    #[test]
    fn test_recent_chat_is_newest_first_and_limited() {
        let mut workspace = BookWorkspace::default();
        for i in 0..8 {
            workspace.push_chat(format!("q{}", i), format!("a{}", i));
        }
        let questions: Vec<_> = workspace.recent_chat().map(|t| t.question.as_str()).collect();
        assert_eq!(questions, vec!["q7", "q6", "q5", "q4", "q3", "q2"]);
    }
}
