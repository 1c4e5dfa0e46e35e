//! 书籍助手 - 业务能力层
//!
//! 把书籍正文拼进提示词，调用模型完成摘要、关键词、翻译、问答和出题

use tracing::info;

use crate::error::AppResult;
use crate::models::quiz::QuizRequest;
use crate::services::llm_service::ChatModel;

/// 可选的翻译目标语言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Russian,
    Kazakh,
    French,
    German,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Russian,
        Language::Kazakh,
        Language::French,
        Language::German,
        Language::Spanish,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Language::Russian => "Russian",
            Language::Kazakh => "Kazakh",
            Language::French => "French",
            Language::German => "German",
            Language::Spanish => "Spanish",
        }
    }

    /// 忽略大小写按名称查找
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(name))
    }
}

/// 书籍助手
pub struct BookAssistant<M> {
    model: M,
    max_tokens: u32,
    quiz_max_tokens: u32,
}

impl<M: ChatModel> BookAssistant<M> {
    pub fn new(model: M, max_tokens: u32, quiz_max_tokens: u32) -> Self {
        Self {
            model,
            max_tokens,
            quiz_max_tokens,
        }
    }

    /// 5~8 句的简要摘要
    pub async fn summarize(&self, content: &str) -> AppResult<String> {
        info!("📝 正在生成摘要...");
        self.model
            .complete(&summary_prompt(content), None, self.max_tokens)
            .await
    }

    /// 前 8 个关键词和主题
    pub async fn extract_keywords(&self, content: &str) -> AppResult<String> {
        info!("🏷️ 正在提取关键词...");
        self.model
            .complete(&keywords_prompt(content), None, self.max_tokens)
            .await
    }

    pub async fn translate(&self, content: &str, language: Language) -> AppResult<String> {
        info!("🌐 正在翻译为 {}...", language.name());
        self.model
            .complete(&translate_prompt(content, language), None, self.max_tokens)
            .await
    }

    /// 基于摘录回答问题
    pub async fn ask(&self, content: &str, question: &str) -> AppResult<String> {
        info!("💬 正在回答问题...");
        self.model
            .complete(&chat_prompt(content, question), None, self.max_tokens)
            .await
    }

    /// 生成选择题（原始输出，格式不受控）
    pub async fn generate_quiz(&self, content: &str, request: QuizRequest) -> AppResult<String> {
        info!(
            "🎮 正在生成 {} 道 {} 难度的选择题...",
            request.num_questions(),
            request.difficulty.name()
        );
        self.model
            .complete(&quiz_prompt(content, request), None, self.quiz_max_tokens)
            .await
    }

    /// 请模型把测验重排成 `###` 分隔的纯文本格式
    pub async fn reformat_quiz(&self, raw_quiz: &str) -> AppResult<String> {
        info!("🔁 正在整理测验格式...");
        self.model
            .complete(&reformat_prompt(raw_quiz), None, self.quiz_max_tokens)
            .await
    }
}

// ========== 提示词 ==========

fn summary_prompt(content: &str) -> String {
    format!(
        "Read the following text and provide a concise, clear summary (~5-8 sentences). Text:\n\n{}",
        content
    )
}

fn keywords_prompt(content: &str) -> String {
    format!(
        "Extract the top 8 keywords and main themes from the text below as a comma-separated list and then one-line explanation for each:\n\n{}",
        content
    )
}

fn translate_prompt(content: &str, language: Language) -> String {
    format!(
        "Translate the following text into {} preserving meaning and readability:\n\n{}",
        language.name(),
        content
    )
}

fn chat_prompt(content: &str, question: &str) -> String {
    format!(
        "You are an assistant that answers questions based on the provided book excerpt. Excerpt:\n\n{}\n\nQuestion: {}\nAnswer concisely and cite lines if useful.",
        content, question
    )
}

fn quiz_prompt(content: &str, request: QuizRequest) -> String {
    format!(
        "Create {} multiple-choice questions (4 choices each) based on the following text. Provide output in JSON array form where each element has 'question','choices' (list of 4) and 'answer' (text of correct choice). Difficulty: {}.\n\nText:\n{}",
        request.num_questions(),
        request.difficulty.name(),
        content
    )
}

fn reformat_prompt(raw_quiz: &str) -> String {
    format!(
        "Reformat the following quiz into a simple numbered list. For each question provide: Q:..., A:[choice text], Choices:[choice1|choice2|choice3|choice4]. Keep exact formatting and separate questions with '###'.\n\n{}",
        raw_quiz
    )
}
