use serde::{Deserialize, Serialize};

use crate::models::book::{Book, BookId, NewBook};

/// 演示书的正文
const DEMO_TEXT: &str = "This is a sample text for demo. It contains ideas about habits, learning, and productivity. Use the AI Assistant to summarize or generate exercises.";

/// 内存书库，保持插入顺序
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    pub books: Vec<Book>,
}

impl Library {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// 带三本示例书（无正文）的书库
    pub fn with_samples() -> Self {
        Self::new(vec![
            Book::sample("Atomic Habits", "James Clear", "9780735211292", "self-help"),
            Book::sample("The Alchemist", "Paulo Coelho", "9780061122415", "fiction"),
            Book::sample("1984", "George Orwell", "9780451524935", "dystopia"),
        ])
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn find(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn find_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    /// 按标题、作者、标签搜索；空查询返回全部
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.books.iter().collect();
        }
        self.books.iter().filter(|b| b.matches(&query)).collect()
    }

    /// 新书插到最前面
    pub fn add(&mut self, form: NewBook) -> BookId {
        let book = Book::from(form);
        let id = book.id;
        self.books.insert(0, book);
        id
    }

    /// 追加一本带示例正文的演示书
    pub fn add_demo_book(&mut self) -> BookId {
        let book = Book {
            id: BookId::new(),
            title: "Sample Book — AI Demo".to_string(),
            author: "Team".to_string(),
            isbn: String::new(),
            content: DEMO_TEXT.to_string(),
            tags: vec!["demo".to_string()],
            cover_url: crate::models::book::PLACEHOLDER_COVER.to_string(),
        };
        let id = book.id;
        self.books.push(book);
        id
    }
}
