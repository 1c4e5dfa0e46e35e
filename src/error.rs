use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 测验相关错误
    #[error("测验错误: {0}")]
    Quiz(#[from] QuizError),
    /// 书库相关错误
    #[error("书库错误: {0}")]
    Library(#[from] LibraryError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 测验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    /// 题目索引超出范围（调用方违反约定，不做截断）
    #[error("题目索引 {index} 超出范围，共 {len} 道题")]
    IndexOutOfRange { index: usize, len: usize },
    /// 用户输入的题号（从 1 开始）不存在
    #[error("没有第 {number} 题，共 {len} 道题")]
    QuestionNumberOutOfRange { number: usize, len: usize },
    /// 选项编号超出范围
    #[error("选项编号 {choice} 超出范围，第 {question} 题共 {len} 个选项")]
    ChoiceOutOfRange {
        question: usize,
        choice: usize,
        len: usize,
    },
    /// 当前没有进行中的测验
    #[error("当前没有进行中的测验")]
    NoActiveQuiz,
    /// 还没有生成测验原文
    #[error("还没有生成测验，请先生成")]
    NoRawQuiz,
}

/// 书库错误
#[derive(Debug, Error)]
pub enum LibraryError {
    /// 书籍不存在
    #[error("书库中找不到该书: {id}")]
    BookNotFound { id: String },
    /// 没有打开任何书
    #[error("还没有打开任何书")]
    NoBookSelected,
    /// 书库文件加载失败
    #[error("书库文件加载失败 ({path}): {source}")]
    LoadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// 没有配置 API Key
    #[error("AI not available (missing API key).")]
    NotConfigured,
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("JSON序列化失败: {}", err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建书籍不存在错误
    pub fn book_not_found(id: impl ToString) -> Self {
        AppError::Library(LibraryError::BookNotFound { id: id.to_string() })
    }

    /// 创建书库文件加载错误
    pub fn library_load_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Library(LibraryError::LoadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_error_converts_into_app_error() {
        let err: AppError = QuizError::IndexOutOfRange { index: 5, len: 3 }.into();
        assert!(matches!(
            err,
            AppError::Quiz(QuizError::IndexOutOfRange { index: 5, len: 3 })
        ));
        assert_eq!(err.to_string(), "测验错误: 题目索引 5 超出范围，共 3 道题");
    }

    #[test]
    fn test_not_configured_message_matches_user_text() {
        assert_eq!(
            LlmError::NotConfigured.to_string(),
            "AI not available (missing API key)."
        );
    }
}
