//! 测验文本解析 - 业务能力层
//!
//! 把模型返回的半结构化测验文本解析成题目列表。
//! 文本格式只是"请求"模型遵守，并不保证，所以这里没有语法，
//! 只有逐层兜底：解析永远不会失败。
//!
//! 期望的格式：
//! ```text
//! Q: What color is the sky?
//! Choices: Red|Blue|Green|Yellow
//! A: Blue
//! ###
//! Q: ...
//! ```

use crate::models::quiz::ParsedQuestion;

/// 题目分隔符
pub const BLOCK_SEPARATOR: &str = "###";

/// 兜底提取时最多收集的选项数
pub const MAX_FALLBACK_CHOICES: usize = 4;

/// 完全提取不到选项时的占位选项
pub const PLACEHOLDER_CHOICES: [&str; 4] = ["Option 1", "Option 2", "Option 3", "Option 4"];

/// 解析整段测验文本
///
/// 空文本返回空列表；题目顺序与原文一致；相同输入总是得到相同结果
pub fn parse_quiz(raw: &str) -> Vec<ParsedQuestion> {
    raw.split(BLOCK_SEPARATOR)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .enumerate()
        .map(|(position, block)| parse_block(block, position))
        .collect()
}

/// 解析单个题目块，`position` 从 0 开始
fn parse_block(block: &str, position: usize) -> ParsedQuestion {
    // \r\n、\n 和单独的 \r 都算换行
    let lines: Vec<&str> = block
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let text = match lines.first() {
        Some(&first) => first.strip_prefix("Q:").map(str::trim).unwrap_or(first).to_string(),
        None => format!("Question {}", position + 1),
    };

    let mut choices = choices_from_line(&lines);
    if choices.is_empty() {
        choices = fallback_choices(&lines);
    }
    if choices.is_empty() {
        choices = PLACEHOLDER_CHOICES.iter().map(|c| c.to_string()).collect();
    }

    ParsedQuestion {
        text,
        choices,
        declared_answer: declared_answer(&lines),
        user_selection: None,
    }
}

/// 从第一行 `Choices:` 中取选项，优先按 `|` 分割，否则按 `,`
fn choices_from_line(lines: &[&str]) -> Vec<String> {
    let Some(line) = lines
        .iter()
        .find(|line| line.to_lowercase().starts_with("choices"))
    else {
        return Vec::new();
    };

    let Some((_, rest)) = line.split_once(':') else {
        return Vec::new();
    };

    let rest = rest.trim();
    let delimiter = if rest.contains('|') { '|' } else { ',' };
    rest.split(delimiter)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// 把第一行之后的各行当作选项，最多取 4 个
///
/// 部分结果（1~3 个）原样保留，不补齐；只有编号的行得到空选项
fn fallback_choices(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .skip(1)
        .map(|line| strip_enumeration(line))
        .take(MAX_FALLBACK_CHOICES)
        .map(str::to_string)
        .collect()
}

/// 去掉形如 `A)` / `b.` 的两字符编号
fn strip_enumeration(line: &str) -> &str {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(')' | '.')) if first.is_alphabetic() => chars.as_str().trim(),
        _ => line,
    }
}

/// 第一行以 `a:` 或 `answer:` 开头（忽略大小写）的内容
fn declared_answer(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find(|line| {
            let lower = line.to_lowercase();
            lower.starts_with("a:") || lower.starts_with("answer:")
        })
        .and_then(|line| line.split_once(':'))
        .map(|(_, answer)| answer.trim())
        .filter(|answer| !answer.is_empty())
        .map(str::to_string)
}
