//! LLM 层：生成式文本服务抽象与实现（OpenAI 兼容 / Gemini / Mock）与重试包装

pub mod gemini;
pub mod mock;
pub mod openai;
pub mod retry;
pub mod traits;

use std::sync::Arc;
use std::time::Duration;

pub use gemini::{create_gemini_client, GEMINI_API_KEY_ENV, GEMINI_BASE_URL, GEMINI_FLASH};
pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use retry::{RetryConfig, RetryingLlmClient};
pub use traits::{LlmClient, LlmError};

use crate::config::AppConfig;

/// 按配置创建客户端并套上重试；没有可用 Key 时退回 Mock
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let timeout = Duration::from_secs(cfg.llm.timeouts.request);

    let base: Arc<dyn LlmClient> = match provider.as_str() {
        "gemini" => match create_gemini_client(Some(&cfg.llm.model), None) {
            Ok(client) => {
                tracing::info!("Using Gemini LLM ({})", cfg.llm.model);
                Arc::new(client.with_timeout(timeout))
            }
            Err(e) => {
                tracing::warn!("{}, using Mock LLM", e);
                Arc::new(MockLlmClient::new())
            }
        },
        "openai" => match std::env::var("OPENAI_API_KEY") {
            Ok(key) => {
                tracing::info!("Using OpenAI-compatible LLM ({})", cfg.llm.model);
                Arc::new(
                    OpenAiClient::new(cfg.llm.base_url.as_deref(), &cfg.llm.model, &key)
                        .with_timeout(timeout),
                )
            }
            Err(_) => {
                tracing::warn!("OPENAI_API_KEY not set, using Mock LLM");
                Arc::new(MockLlmClient::new())
            }
        },
        "mock" => Arc::new(MockLlmClient::new()),
        other => {
            tracing::warn!("Unknown LLM provider '{}', using Mock LLM", other);
            Arc::new(MockLlmClient::new())
        }
    };

    Arc::new(RetryingLlmClient::new(base, cfg.llm.retry.to_retry_config()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_from_config() {
        let mut cfg = AppConfig::default();
        cfg.llm.provider = "mock".to_string();
        let client = create_llm_from_config(&cfg);
        assert_eq!(client.model_name(), "mock");
    }
}
