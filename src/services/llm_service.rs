//! LLM 服务 - 业务能力层
//!
//! 只负责"把一段提示词发给模型并拿回文本"，不关心提示词内容
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务
//! - 单次请求/响应：不重试、不流式、不缓存

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, LlmError};
use crate::utils::truncate_text;

/// 文本生成能力
///
/// 书籍助手只依赖这个接口，方便在测试中替换
// 只在本 crate 内以泛型静态分发使用，不需要 Send 约束
#[allow(async_fn_in_trait)]
pub trait ChatModel {
    /// 发送一条用户消息（可带系统消息），返回去掉首尾空白的回复
    async fn complete(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        max_tokens: u32,
    ) -> AppResult<String>;
}

/// LLM 服务
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务，没有 API Key 时返回 `None`
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.llm_api_key.as_deref()?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.llm_api_base_url);

        Some(Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    /// - `max_tokens`: 回复的最大 token 数
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        max_tokens: u32,
    ) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息: {}", truncate_text(user_message, 120));

        let model = self.model_name.as_str();
        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AppError::llm_api_failed(model, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::llm_api_failed(model, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .max_tokens(max_tokens)
            .build()
            .map_err(|e| AppError::llm_api_failed(model, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(model, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: model.to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

impl ChatModel for LlmService {
    async fn complete(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        max_tokens: u32,
    ) -> AppResult<String> {
        self.send_to_llm(user_message, system_message, max_tokens)
            .await
    }
}
