/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按配置选择 `info` 或 `debug`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能重复初始化，忽略错误
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "📚 Book AI 启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if config.ai_enabled() {
        info!("✅ AI 已连接，模型: {}", config.llm_model_name);
    } else {
        warn!("⚠️ 未找到 API Key (LLM_API_KEY / OPENAI_API_KEY)，AI 功能已禁用");
    }
    info!("{}", "=".repeat(60));
}

/// 记录测验得分
pub fn log_quiz_score(title: &str, score: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("🎯 《{}》测验完成: {}/{}", title, score, total);
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
