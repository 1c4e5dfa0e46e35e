//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `command` - 终端命令
//! - 把一行输入解析成 `Command`，纯函数
//!
//! ### `app` - 终端应用
//! - 管理应用生命周期（初始化、命令循环）
//! - 唯一持有 `ReadingSession` 的地方
//! - 把结果打印给用户
//!
//! ## 层次关系
//!
//! ```text
//! app (命令循环)
//!     ↓
//! workflow::BookFlow (处理当前打开的书)
//!     ↓
//! services (能力层：llm / assistant / quiz_parser)
//!     ↓
//! state + models (会话状态与数据)
//! ```

pub mod app;
pub mod command;

// 重新导出主要类型
pub use app::{App, Flow};
pub use command::{Command, HELP};
