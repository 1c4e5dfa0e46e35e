//! 终端应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、加载书库、创建 LLM 服务
//! 2. **命令循环**：逐行读取 stdin，一条命令执行完才读下一条
//! 3. **结果展示**：把流程层的结果打印给用户
//!
//! 会话状态（`ReadingSession`）只在这里持有，显式传给流程层

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::book::{Book, BookId};
use crate::models::loaders::load_library;
use crate::orchestrator::command::{Command, HELP};
use crate::services::{BookAssistant, ChatModel, LlmService};
use crate::state::{Library, ReadingSession, ToggleOutcome};
use crate::utils::logging::log_startup;
use crate::workflow::{self, BookFlow};

/// 命令执行后是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// 应用主结构
pub struct App<M = LlmService> {
    session: ReadingSession,
    flow: BookFlow<M>,
    /// 最近一次 list 的结果，`open <n>` 按它编号
    last_listing: Vec<BookId>,
}

impl App<LlmService> {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置无效")?;
        log_startup(&config);

        let library = match &config.library_file {
            Some(path) => load_library(Path::new(path)).await?,
            None => Library::with_samples(),
        };

        let assistant = LlmService::from_config(&config).map(|service| {
            BookAssistant::new(service, config.llm_max_tokens, config.quiz_max_tokens)
        });

        Ok(Self::new(ReadingSession::new(library), BookFlow::new(assistant)))
    }

    /// 运行命令循环，直到 `quit` 或输入结束
    pub async fn run(&mut self) -> Result<()> {
        println!("📚 Book AI — summaries · chat · quizzes · personal library");
        println!("{}", HELP);
        self.print_listing("");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("读取输入失败")? {
            if line.trim().is_empty() {
                continue;
            }
            if self.execute_line(&line).await == Flow::Exit {
                break;
            }
        }

        info!("👋 会话结束");
        Ok(())
    }
}

impl<M: ChatModel> App<M> {
    pub fn new(session: ReadingSession, flow: BookFlow<M>) -> Self {
        Self {
            session,
            flow,
            last_listing: Vec::new(),
        }
    }

    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    /// 解析并执行一行命令，错误直接打印给用户
    pub async fn execute_line(&mut self, line: &str) -> Flow {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(message) => {
                println!("⚠️ {}", message);
                println!("{}", HELP);
                return Flow::Continue;
            }
        };

        match self.execute(command).await {
            Ok(flow) => flow,
            Err(e) => {
                warn!("命令执行失败: {}", e);
                println!("❌ {}", e);
                Flow::Continue
            }
        }
    }

    /// 执行一条命令
    pub async fn execute(&mut self, command: Command) -> AppResult<Flow> {
        match command {
            Command::List(query) => self.print_listing(&query),
            Command::Add(form) => {
                let id = self.session.library.add(form);
                if let Some(book) = self.session.library.find(id) {
                    println!("✅ Added '{}' to library.", book.title);
                }
                self.print_listing("");
            }
            Command::Demo => {
                self.session.library.add_demo_book();
                println!("✅ Demo book added to library.");
                self.print_listing("");
            }
            Command::Open(n) => {
                let id = self.listed_id(n)?;
                let book = self.session.open(id)?;
                println!("📖 Opened {}", book);
            }
            Command::Close => {
                self.session.close();
                self.print_listing("");
            }
            Command::Save => {
                let id = self.session.selected_id()?;
                match self.session.toggle_my_books(id)? {
                    ToggleOutcome::Added => println!("✅ Added to My Books."),
                    ToggleOutcome::Removed => println!("✅ Removed from My Books."),
                }
            }
            Command::Shelf => self.print_shelf(),
            Command::Remove(n) => {
                let id = n
                    .checked_sub(1)
                    .and_then(|i| self.session.my_books().get(i).map(|b| b.id));
                match id {
                    Some(id) => {
                        self.session.remove_from_my_books(id);
                        println!("✅ Removed from My Books.");
                    }
                    None => println!("⚠️ My Books has no entry {}.", n),
                }
            }
            Command::Content(text) => {
                let id = self.session.selected_id()?;
                self.session.save_content(id, text)?;
                println!("✅ Content saved to library entry.");
            }
            Command::Show => self.print_workspace()?,
            Command::Summary => {
                let summary = self.flow.summarize(&mut self.session).await?;
                println!("Summary (AI):\n{}", summary);
            }
            Command::Keywords => {
                let keywords = self.flow.extract_keywords(&mut self.session).await?;
                println!("Keywords & Themes (AI):\n{}", keywords);
            }
            Command::Translate(language) => {
                let translation = self.flow.translate(&mut self.session, language).await?;
                println!("Translation (AI, {}):\n{}", language.name(), translation);
            }
            Command::Ask(question) => {
                let answer = self.flow.ask(&mut self.session, &question).await?;
                println!("Q: {}\nA: {}", question, answer);
            }
            Command::Quiz(request) => {
                let raw = self.flow.generate_quiz(&mut self.session, request).await?;
                println!("Generated quiz (raw AI output):\n{}", raw);
                println!("Type `play` to start the quiz.");
            }
            Command::Play => {
                self.flow.start_quiz(&mut self.session).await?;
                self.print_quiz()?;
            }
            Command::Load(path) => {
                let text = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| AppError::Other(format!("无法读取测验文件 {}: {}", path, e)))?;
                workflow::start_quiz_from_text(&mut self.session, &text)?;
                self.print_quiz()?;
            }
            Command::Pick { question, choice } => {
                let selected = workflow::pick_answer(&mut self.session, question, choice)?;
                println!("{}. → {}", question, selected);
            }
            Command::Submit => {
                let report = workflow::submit_quiz(&mut self.session)?;
                println!("🎯 {}", report);
            }
            Command::Export => {
                let quiz = workflow::active_quiz(&mut self.session)?;
                println!("{}", serde_json::to_string_pretty(&*quiz)?);
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    /// 第 n 个（从 1 开始）列出的书
    fn listed_id(&self, n: usize) -> AppResult<BookId> {
        n.checked_sub(1)
            .and_then(|i| self.last_listing.get(i).copied())
            .ok_or_else(|| AppError::book_not_found(format!("#{}", n)))
    }

    // ========== 展示 ==========

    fn print_listing(&mut self, query: &str) {
        let results = self.session.library.search(query);
        self.last_listing = results.iter().map(|b| b.id).collect();

        if results.is_empty() {
            println!("No books found in the library.");
            return;
        }

        println!("📚 Library");
        for (i, book) in results.iter().enumerate() {
            let saved = if self.session.is_saved(book.id) { " ★" } else { "" };
            println!("  {}. {}{}", i + 1, book, saved);
        }
    }

    fn print_shelf(&self) {
        let books = self.session.my_books();
        if books.is_empty() {
            println!("Your shelf is empty — add books from library.");
            return;
        }
        println!("📘 My Books");
        for (i, book) in books.iter().enumerate() {
            println!("  {}. {}", i + 1, book);
        }
    }

    fn print_workspace(&self) -> AppResult<()> {
        let book: &Book = self.session.selected_book()?;
        println!("## {}  by {}", book.title, book.author);
        println!("Tags: {}", if book.tags.is_empty() { "-".to_string() } else { book.tags.join(", ") });
        println!("Cover: {}", book.cover_url);
        println!("Content:\n{}", if book.content.is_empty() { "(empty)" } else { book.content.as_str() });

        if !self.flow.ai_available() {
            println!("⚠️ AI unavailable (set LLM_API_KEY or OPENAI_API_KEY)");
        }

        let Some(workspace) = self.session.workspace(book.id) else {
            return Ok(());
        };
        if let Some(summary) = &workspace.summary {
            println!("\nSummary (AI):\n{}", summary);
        }
        if let Some(keywords) = &workspace.keywords {
            println!("\nKeywords & Themes (AI):\n{}", keywords);
        }
        if let Some(translation) = &workspace.translation {
            println!("\nTranslation (AI):\n{}", translation);
        }
        let mut recent = workspace.recent_chat().peekable();
        if recent.peek().is_some() {
            println!("\nChat History:");
            for turn in recent {
                println!("Q: {}\nA: {}\n---", turn.question, turn.answer);
            }
        }
        Ok(())
    }

    fn print_quiz(&mut self) -> AppResult<()> {
        let quiz = workflow::active_quiz(&mut self.session)?;
        if quiz.is_empty() {
            println!("⚠️ No questions could be read from the quiz text.");
            return Ok(());
        }
        for (qi, question) in quiz.questions.iter().enumerate() {
            println!("{}. {}", qi + 1, question.text);
            for (ci, choice) in question.choices.iter().enumerate() {
                println!("   {}) {}", ci + 1, choice);
            }
        }
        println!("Answer with `pick <question> <choice>`, then `submit`.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BookWorkspace;

    struct CannedModel(&'static str);

    impl ChatModel for CannedModel {
        async fn complete(
            &self,
            _user_message: &str,
            _system_message: Option<&str>,
            _max_tokens: u32,
        ) -> AppResult<String> {
            Ok(self.0.to_string())
        }
    }

    fn app(reply: &'static str) -> App<CannedModel> {
        let flow = BookFlow::new(Some(BookAssistant::new(CannedModel(reply), 600, 900)));
        let mut app = App::new(ReadingSession::new(Library::with_samples()), flow);
        app.print_listing("");
        app
    }

    fn workspace(app: &App<CannedModel>) -> &BookWorkspace {
        let id = app.session().selected_id().unwrap();
        app.session().workspace(id).unwrap()
    }

    #[tokio::test]
    async fn test_open_and_toggle_shelf() {
        let mut app = app("");
        assert_eq!(app.execute_line("open 2").await, Flow::Continue);
        assert_eq!(app.session().selected_book().unwrap().title, "The Alchemist");

        app.execute_line("save").await;
        assert_eq!(app.session().my_books().len(), 1);
        app.execute_line("remove 1").await;
        assert!(app.session().my_books().is_empty());
    }

    #[tokio::test]
    async fn test_open_uses_last_listing() {
        let mut app = app("");
        app.execute_line("list orwell").await;
        app.execute_line("open 1").await;
        assert_eq!(app.session().selected_book().unwrap().title, "1984");

        assert!(app.execute(Command::Open(9)).await.is_err());
    }

    #[tokio::test]
    async fn test_full_quiz_round() {
        let mut app = app("Q: Who wrote it?\nChoices: James Clear|Paulo Coelho\nA: James Clear");
        app.execute_line("open 1").await;
        app.execute_line("content Habits compound over time.").await;
        app.execute_line("quiz 1 easy").await;
        assert!(workspace(&app).quiz_raw.is_some());

        app.execute_line("play").await;
        app.execute_line("pick 1 2").await;
        app.execute_line("submit").await;

        let quiz = workspace(&app).quiz.as_ref().unwrap();
        assert_eq!(quiz.score(), (0, 1));

        app.execute_line("pick 1 1").await;
        let quiz = workspace(&app).quiz.as_ref().unwrap();
        assert_eq!(quiz.score(), (1, 1));
    }

    #[tokio::test]
    async fn test_chat_history_is_recorded() {
        let mut app = app("Because habits compound.");
        app.execute_line("open 1").await;
        app.execute_line("ask Why do habits matter?").await;

        let history = &workspace(&app).chat_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].answer, "Because habits compound.");
    }

    #[tokio::test]
    async fn test_quit_and_bad_input() {
        let mut app = app("");
        assert_eq!(app.execute_line("frobnicate").await, Flow::Continue);
        assert_eq!(app.execute_line("submit").await, Flow::Continue);
        assert_eq!(app.execute_line("quit").await, Flow::Exit);
    }
}
