use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// 解析后的单道题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    /// 题干
    pub text: String,
    /// 选项，永不为空
    pub choices: Vec<String>,
    /// 模型给出的答案，可能缺失
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_answer: Option<String>,
    /// 用户的选择
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_selection: Option<String>,
}

impl ParsedQuestion {
    /// 是否答对：两边都非空时做双向、忽略大小写的子串匹配
    pub fn is_correct(&self) -> bool {
        let (Some(declared), Some(selected)) = (
            non_blank(self.declared_answer.as_deref()),
            non_blank(self.user_selection.as_deref()),
        ) else {
            return false;
        };

        let declared = declared.to_lowercase();
        let selected = selected.to_lowercase();
        selected.contains(&declared) || declared.contains(&selected)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 一次测验
///
/// 每次提交新的测验文本都会重新创建，不做持久化
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSession {
    pub questions: Vec<ParsedQuestion>,
}

impl QuizSession {
    pub fn new(questions: Vec<ParsedQuestion>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 记录用户对第 `index` 题（从 0 开始）的选择，后一次覆盖前一次
    ///
    /// 索引越界属于调用方错误，不做截断
    pub fn record_selection(
        &mut self,
        index: usize,
        selection: impl Into<String>,
    ) -> Result<(), QuizError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get_mut(index)
            .ok_or(QuizError::IndexOutOfRange { index, len })?;
        question.user_selection = Some(selection.into());
        Ok(())
    }

    /// 按选项编号（从 1 开始）记录选择
    pub fn select_choice(&mut self, index: usize, choice_number: usize) -> Result<(), QuizError> {
        let len = self.questions.len();
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::IndexOutOfRange { index, len })?;
        let choice = choice_number
            .checked_sub(1)
            .and_then(|i| question.choices.get(i))
            .ok_or(QuizError::ChoiceOutOfRange {
                question: index + 1,
                choice: choice_number,
                len: question.choices.len(),
            })?
            .clone();
        self.record_selection(index, choice)
    }

    /// 没有作答的题默认选第一个选项
    pub fn fill_default_selections(&mut self) {
        for question in &mut self.questions {
            if question.user_selection.is_none() {
                question.user_selection = question.choices.first().cloned();
            }
        }
    }

    /// 计算得分，返回 (score, total)
    ///
    /// total 为题目总数，与是否有答案无关
    pub fn score(&self) -> (usize, usize) {
        let score = self.questions.iter().filter(|q| q.is_correct()).count();
        (score, self.questions.len())
    }
}

/// 测验难度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// 生成测验的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRequest {
    num_questions: u8,
    pub difficulty: Difficulty,
}

impl QuizRequest {
    pub const MIN_QUESTIONS: u8 = 1;
    pub const MAX_QUESTIONS: u8 = 8;

    /// 题目数量限制在 1..=8
    pub fn new(num_questions: u8, difficulty: Difficulty) -> Self {
        Self {
            num_questions: num_questions.clamp(Self::MIN_QUESTIONS, Self::MAX_QUESTIONS),
            difficulty,
        }
    }

    pub fn num_questions(&self) -> u8 {
        self.num_questions
    }
}

impl Default for QuizRequest {
    fn default() -> Self {
        Self::new(3, Difficulty::default())
    }
}
