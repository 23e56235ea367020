//! 生成式文本服务抽象
//!
//! 所有后端（OpenAI 兼容 / Gemini / Mock）实现 LlmClient：输入 prompt，返回模型的原始文本。
//! 返回内容不保证是 JSON，由 parser 负责恢复。

use async_trait::async_trait;
use thiserror::Error;

/// 调用模型时的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// 未配置 API Key（对应前端「API Key no proporcionada」）
    #[error("API key not provided: set {0}")]
    MissingApiKey(String),
}

impl LlmError {
    /// 缺少 Key 重试也不会成功，其余错误可以重试
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::MissingApiKey(_))
    }
}

/// 生成式文本服务：prompt 进，自由文本出，可能失败
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// 日志用的模型名
    fn model_name(&self) -> &str {
        "unknown"
    }
}
