use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 书籍封面占位图
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/200x300.png?text=Book";

/// 书籍唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 书籍
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    /// 可编辑的正文/摘录
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_cover")]
    pub cover_url: String,
}

fn default_cover() -> String {
    PLACEHOLDER_COVER.to_string()
}

impl Book {
    /// 用 ISBN 创建一本示例书（封面取自 Open Library）
    pub fn sample(title: &str, author: &str, isbn: &str, tag: &str) -> Self {
        Self {
            id: BookId::new(),
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            content: String::new(),
            tags: vec![tag.to_string()],
            cover_url: format!("https://covers.openlibrary.org/b/isbn/{}-L.jpg", isbn),
        }
    }

    /// 标题、作者或任一标签包含查询词（查询词需已小写）
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query)
            || self.author.to_lowercase().contains(query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(query))
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}", self.title, self.author)
    }
}

/// 新书表单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    /// 逗号分隔
    pub tags: String,
    pub cover_url: String,
    pub content: String,
}

impl From<NewBook> for Book {
    fn from(form: NewBook) -> Self {
        fn or_default(value: String, default: &str) -> String {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value
            }
        }

        Self {
            id: BookId::new(),
            title: or_default(form.title, "Untitled"),
            author: or_default(form.author, "Unknown"),
            isbn: String::new(),
            content: form.content,
            tags: form
                .tags
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            cover_url: or_default(form.cover_url, PLACEHOLDER_COVER),
        }
    }
}
