//! Gemini 客户端（通过 Google 的 OpenAI 兼容端点）
//!
//! - Base URL: https://generativelanguage.googleapis.com/v1beta/openai/
//! - 模型: gemini-2.0-flash

use crate::llm::{LlmError, OpenAiClient};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const GEMINI_FLASH: &str = "gemini-2.0-flash";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// 创建 Gemini 客户端
///
/// - Key 取自参数，其次环境变量 `GEMINI_API_KEY`；都没有时返回 MissingApiKey
/// - 模型默认 gemini-2.0-flash
pub fn create_gemini_client(
    model: Option<&str>,
    api_key: Option<&str>,
) -> Result<OpenAiClient, LlmError> {
    let api_key = api_key
        .map(String::from)
        .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| LlmError::MissingApiKey(GEMINI_API_KEY_ENV.to_string()))?;

    let model = model.unwrap_or(GEMINI_FLASH);
    Ok(OpenAiClient::new(Some(GEMINI_BASE_URL), model, &api_key))
}
