use std::path::Path;

use serde::Deserialize;
use tokio::fs;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::book::Book;
use crate::state::Library;

/// 书库文件结构
///
/// ```toml
/// [[books]]
/// title = "Walden"
/// author = "Henry David Thoreau"
/// tags = ["nature"]
/// content = "I went to the woods..."
/// ```
#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    books: Vec<Book>,
}

/// 解析 TOML 文本为书库
pub fn parse_library(content: &str) -> Result<Library, toml::de::Error> {
    let file: LibraryFile = toml::from_str(content)?;
    Ok(Library::new(file.books))
}

/// 从 TOML 文件加载书库
pub async fn load_library(path: &Path) -> AppResult<Library> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::library_load_failed(&path_str, e))?;

    let library =
        parse_library(&content).map_err(|e| AppError::library_load_failed(&path_str, e))?;

    info!("📁 从 {} 加载了 {} 本书", path_str, library.len());

    Ok(library)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::PLACEHOLDER_COVER;

    #[test]
    fn test_parse_library_fills_defaults() {
        let library = parse_library(
            r#"
            [[books]]
            title = "Walden"
            author = "Henry David Thoreau"
            tags = ["nature"]

            [[books]]
            title = "Dune"
            author = "Frank Herbert"
            content = "A beginning is the time..."
            "#,
        )
        .unwrap();

        assert_eq!(library.len(), 2);
        assert_eq!(library.books[0].cover_url, PLACEHOLDER_COVER);
        assert_eq!(library.books[0].tags, vec!["nature"]);
        assert!(library.books[1].content.starts_with("A beginning"));
        assert_ne!(library.books[0].id, library.books[1].id);
    }

    #[test]
    fn test_parse_library_rejects_missing_title() {
        assert!(parse_library("[[books]]\nauthor = \"Nobody\"\n").is_err());
    }

    #[tokio::test]
    async fn test_load_library_from_file() {
        let path = std::env::temp_dir().join(format!("book_ai_library_{}.toml", std::process::id()));
        fs::write(&path, "[[books]]\ntitle = \"Walden\"\nauthor = \"Henry David Thoreau\"\n")
            .await
            .unwrap();

        let library = load_library(&path).await.unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.books[0].title, "Walden");

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let err = load_library(Path::new("does/not/exist.toml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
