//! 书籍处理流程 - 流程层
//!
//! 定义"对当前打开的书"做 AI 操作和测验的完整流程
//!
//! 测验流程：
//! 1. generate → 原始输出存入工作区
//! 2. start → 请模型整理成 `###` 格式 → 解析 → 新的 QuizSession
//! 3. pick → 记录选择
//! 4. submit → 计分

use std::fmt::Display;

use tracing::{info, warn};

use crate::error::{AppResult, LlmError, QuizError};
use crate::models::book::BookId;
use crate::models::quiz::{QuizRequest, QuizSession};
use crate::services::book_assistant::{BookAssistant, Language};
use crate::services::llm_service::ChatModel;
use crate::services::quiz_parser::parse_quiz;
use crate::state::ReadingSession;
use crate::utils::logging::{log_quiz_score, truncate_text};

/// 测验结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizReport {
    pub score: usize,
    pub total: usize,
}

impl Display for QuizReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Quiz finished — score: {}/{} (auto-check best-effort).",
            self.score, self.total
        )
    }
}

/// 书籍处理流程
///
/// - 不持有会话状态，每次调用都传入 `&mut ReadingSession`
/// - 没有 API Key 时 assistant 为 `None`，AI 操作返回 `NotConfigured`
/// - 模型调用失败不算流程错误，错误文本会像普通回复一样保存
pub struct BookFlow<M> {
    assistant: Option<BookAssistant<M>>,
}

impl<M: ChatModel> BookFlow<M> {
    pub fn new(assistant: Option<BookAssistant<M>>) -> Self {
        Self { assistant }
    }

    pub fn ai_available(&self) -> bool {
        self.assistant.is_some()
    }

    fn assistant(&self) -> AppResult<&BookAssistant<M>> {
        Ok(self.assistant.as_ref().ok_or(LlmError::NotConfigured)?)
    }

    // ========== AI 助手 ==========

    pub async fn summarize(&self, session: &mut ReadingSession) -> AppResult<String> {
        let assistant = self.assistant()?;
        let (id, content) = selected_content(session)?;
        let output = render(assistant.summarize(&content).await);
        session.workspace_mut(id).summary = Some(output.clone());
        Ok(output)
    }

    pub async fn extract_keywords(&self, session: &mut ReadingSession) -> AppResult<String> {
        let assistant = self.assistant()?;
        let (id, content) = selected_content(session)?;
        let output = render(assistant.extract_keywords(&content).await);
        session.workspace_mut(id).keywords = Some(output.clone());
        Ok(output)
    }

    pub async fn translate(
        &self,
        session: &mut ReadingSession,
        language: Language,
    ) -> AppResult<String> {
        let assistant = self.assistant()?;
        let (id, content) = selected_content(session)?;
        let output = render(assistant.translate(&content, language).await);
        session.workspace_mut(id).translation = Some(output.clone());
        Ok(output)
    }

    /// 针对摘录提问，问答记入对话历史
    pub async fn ask(&self, session: &mut ReadingSession, question: &str) -> AppResult<String> {
        let assistant = self.assistant()?;
        let (id, content) = selected_content(session)?;
        let output = render(assistant.ask(&content, question).await);
        session.workspace_mut(id).push_chat(question, output.clone());
        Ok(output)
    }

    // ========== 测验 ==========

    /// 生成测验原文并保存
    pub async fn generate_quiz(
        &self,
        session: &mut ReadingSession,
        request: QuizRequest,
    ) -> AppResult<String> {
        let assistant = self.assistant()?;
        let (id, content) = selected_content(session)?;
        let raw = render(assistant.generate_quiz(&content, request).await);
        session.workspace_mut(id).quiz_raw = Some(raw.clone());
        info!("✓ 测验已生成: {}", truncate_text(&raw, 80));
        Ok(raw)
    }

    /// 整理已生成的测验并开始作答
    ///
    /// 返回解析出的题目数
    pub async fn start_quiz(&self, session: &mut ReadingSession) -> AppResult<usize> {
        let assistant = self.assistant()?;
        let id = session.selected_id()?;
        let raw = session
            .workspace(id)
            .and_then(|w| w.quiz_raw.clone())
            .ok_or(QuizError::NoRawQuiz)?;

        let neat = render(assistant.reformat_quiz(&raw).await);
        Ok(start_quiz_from_text(session, &neat)?.len())
    }
}

/// 直接用一段测验文本开始作答（不经过模型）
///
/// 旧的测验会被替换
pub fn start_quiz_from_text<'a>(
    session: &'a mut ReadingSession,
    text: &str,
) -> AppResult<&'a QuizSession> {
    let id = session.selected_id()?;
    let quiz = QuizSession::new(parse_quiz(text));
    if quiz.is_empty() {
        warn!("⚠️ 测验文本中没有解析出任何题目");
    } else {
        info!("🎮 解析出 {} 道题", quiz.len());
    }
    let workspace = session.workspace_mut(id);
    Ok(&*workspace.quiz.insert(quiz))
}

/// 记录第 `question_number` 题选择第 `choice_number` 个选项（都从 1 开始）
pub fn pick_answer(
    session: &mut ReadingSession,
    question_number: usize,
    choice_number: usize,
) -> AppResult<String> {
    let quiz = active_quiz(session)?;
    let index = question_number
        .checked_sub(1)
        .filter(|index| *index < quiz.len())
        .ok_or(QuizError::QuestionNumberOutOfRange {
            number: question_number,
            len: quiz.len(),
        })?;
    quiz.select_choice(index, choice_number)?;
    Ok(quiz.questions[index]
        .user_selection
        .clone()
        .unwrap_or_default())
}

/// 交卷：未作答的题按默认第一个选项计
pub fn submit_quiz(session: &mut ReadingSession) -> AppResult<QuizReport> {
    let title = session.selected_book()?.title.clone();
    let quiz = active_quiz(session)?;
    quiz.fill_default_selections();
    let (score, total) = quiz.score();
    log_quiz_score(&title, score, total);
    Ok(QuizReport { score, total })
}

/// 当前书正在进行的测验
pub fn active_quiz(session: &mut ReadingSession) -> AppResult<&mut QuizSession> {
    let id = session.selected_id()?;
    Ok(session
        .workspace_mut(id)
        .quiz
        .as_mut()
        .ok_or(QuizError::NoActiveQuiz)?)
}

fn selected_content(session: &ReadingSession) -> AppResult<(BookId, String)> {
    let book = session.selected_book()?;
    Ok((book.id, book.content.clone()))
}

/// 模型失败时把错误渲染成文本
fn render(result: AppResult<String>) -> String {
    result.unwrap_or_else(|e| {
        warn!("AI 调用失败: {}", e);
        format!("AI error: {}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::state::Library;

    struct EchoModel;

    impl ChatModel for EchoModel {
        async fn complete(
            &self,
            user_message: &str,
            _system_message: Option<&str>,
            _max_tokens: u32,
        ) -> AppResult<String> {
            Ok(format!("echo {}", user_message.len()))
        }
    }

    fn opened_session() -> ReadingSession {
        let mut session = ReadingSession::new(Library::with_samples());
        let id = session.library.books[0].id;
        session.open(id).unwrap();
        session
    }

    #[test]
    fn test_ai_actions_require_key() {
        let flow: BookFlow<EchoModel> = BookFlow::new(None);
        let mut session = opened_session();
        let err = tokio_test::block_on(flow.summarize(&mut session)).unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_summary_is_stored_in_workspace() {
        let flow = BookFlow::new(Some(BookAssistant::new(EchoModel, 600, 900)));
        let mut session = opened_session();
        let id = session.selected_id().unwrap();

        let summary = flow.summarize(&mut session).await.unwrap();
        assert_eq!(
            session.workspace(id).unwrap().summary.as_deref(),
            Some(summary.as_str())
        );
    }

    #[tokio::test]
    async fn test_start_quiz_needs_generated_quiz() {
        let flow = BookFlow::new(Some(BookAssistant::new(EchoModel, 600, 900)));
        let mut session = opened_session();
        let err = flow.start_quiz(&mut session).await.unwrap_err();
        assert!(matches!(err, AppError::Quiz(QuizError::NoRawQuiz)));
    }

    #[test]
    fn test_play_from_text_and_submit() {
        let mut session = opened_session();
        start_quiz_from_text(
            &mut session,
            "Q: Sky?\nChoices: Red|Blue\nA: Blue\n###\nQ: Grass?\nChoices: Green|Pink\nA: Green",
        )
        .unwrap();

        assert_eq!(pick_answer(&mut session, 1, 2).unwrap(), "Blue");
        let report = submit_quiz(&mut session).unwrap();
        assert_eq!(report, QuizReport { score: 2, total: 2 });
        assert_eq!(
            report.to_string(),
            "Quiz finished — score: 2/2 (auto-check best-effort)."
        );
    }

    #[test]
    fn test_pick_without_quiz_or_out_of_range() {
        let mut session = opened_session();
        assert!(matches!(
            pick_answer(&mut session, 1, 1),
            Err(AppError::Quiz(QuizError::NoActiveQuiz))
        ));

        start_quiz_from_text(&mut session, "Q: One?\nChoices: a|b").unwrap();
        assert!(matches!(
            pick_answer(&mut session, 2, 1),
            Err(AppError::Quiz(QuizError::QuestionNumberOutOfRange { number: 2, len: 1 }))
        ));

        let err = pick_answer(&mut session, 0, 1).unwrap_err();
        assert!(matches!(
            err,
            AppError::Quiz(QuizError::QuestionNumberOutOfRange { number: 0, len: 1 })
        ));
        assert_eq!(err.to_string(), "测验错误: 没有第 0 题，共 1 道题");
    }

    #[test]
    fn test_new_text_replaces_previous_quiz() {
        let mut session = opened_session();
        start_quiz_from_text(&mut session, "Q: One?\nChoices: a|b").unwrap();
        pick_answer(&mut session, 1, 2).unwrap();

        let quiz = start_quiz_from_text(&mut session, "Q: One?\nChoices: a|b").unwrap();
        assert_eq!(quiz.questions[0].user_selection, None);
    }
}
