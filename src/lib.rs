//! # Book AI
//!
//! 一个终端读书助手：浏览内存书库、收藏、编辑摘录，
//! 并调用兼容 OpenAI 的模型做摘要、关键词、翻译、问答和选择题测验
//!
//! ## 架构设计
//!
//! ### ① 数据与状态（Models / State）
//! - `models/` - `Book`、`ParsedQuestion`、`QuizSession` 等数据结构，TOML 书库加载
//! - `state/` - `Library` 和 `ReadingSession`，一个用户会话的全部状态
//!
//! ### ② 业务能力层（Services）
//! - `LlmService` - 单次请求/响应的模型调用
//! - `BookAssistant` - 各种提示词
//! - `quiz_parser` - 把模型返回的测验文本解析成题目，永不失败
//!
//! ### ③ 流程层（Workflow）
//! - `BookFlow` - 对当前打开的书：AI 操作、出题 → 整理 → 作答 → 计分
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 终端命令循环
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod state;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Book, BookId, ParsedQuestion, QuizSession};
pub use orchestrator::App;
pub use services::parse_quiz;
pub use state::ReadingSession;
pub use workflow::{BookFlow, QuizReport};
