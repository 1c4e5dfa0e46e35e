use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    /// 为空时 AI 功能不可用
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 普通请求的最大 token 数
    pub llm_max_tokens: u32,
    /// 生成/重排测验时的最大 token 数
    pub quiz_max_tokens: u32,
    // --- 书库配置 ---
    /// 可选的 TOML 书库文件，不设置时使用内置示例书
    pub library_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: None,
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_max_tokens: 600,
            quiz_max_tokens: 900,
            library_file: None,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok()
                .filter(|v| !v.trim().is_empty()),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            quiz_max_tokens: std::env::var("QUIZ_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.quiz_max_tokens),
            library_file: std::env::var("LIBRARY_FILE").ok().or(default.library_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 是否配置了 API Key
    pub fn ai_enabled(&self) -> bool {
        self.llm_api_key.is_some()
    }

    /// 校验配置，token 上限不能为 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (var_name, value) in [
            ("LLM_MAX_TOKENS", self.llm_max_tokens),
            ("QUIZ_MAX_TOKENS", self.quiz_max_tokens),
        ] {
            if value == 0 {
                return Err(ConfigError::EnvVarParseFailed {
                    var_name: var_name.to_string(),
                    value: value.to_string(),
                    expected_type: "正整数".to_string(),
                });
            }
        }
        Ok(())
    }
}
