//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `AULA__*` 覆盖（双下划线表示嵌套，如 `AULA__LLM__PROVIDER=mock`）。

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::curriculum::TimeSlot;
use crate::llm::{RetryConfig, GEMINI_FLASH};

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub school: SchoolSection,
    pub storage: StorageSection,
    pub llm: LlmSection,
    pub ingest: IngestSection,
}

/// [app] 段
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    /// 默认日志级别，RUST_LOG 优先
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// [school] 段：存储中没有学校设置时使用
#[derive(Debug, Clone, Deserialize)]
pub struct SchoolSection {
    #[serde(default = "crate::curriculum::model::default_start_date")]
    pub start_date: String,
    /// 未选择年级时使用的年级
    #[serde(default = "default_fallback_grade")]
    pub fallback_grade: String,
    /// 每日课时表，`aula today` 用它给出当前所在的课时
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Default for SchoolSection {
    fn default() -> Self {
        Self {
            start_date: crate::curriculum::model::default_start_date(),
            fallback_grade: default_fallback_grade(),
            time_slots: Vec::new(),
        }
    }
}

fn default_fallback_grade() -> String {
    "2".to_string()
}

/// [storage] 段：键值存储目录（每个键一个 JSON 文件）
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/store")
}

/// [llm] 段：后端选择、超时与重试
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// gemini / openai / mock
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
    #[serde(default)]
    pub retry: LlmRetrySection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            timeouts: LlmTimeoutsSection::default(),
            retry: LlmRetrySection::default(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    GEMINI_FLASH.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmTimeoutsSection {
    /// 单次请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmRetrySection {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for LlmRetrySection {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

impl LlmRetrySection {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            delay: Duration::from_millis(self.delay_ms),
        }
    }
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    1000
}

/// [ingest] 段：发给模型的文本截断长度（字符数）
#[derive(Debug, Clone, Deserialize)]
pub struct IngestSection {
    #[serde(default = "default_max_curriculum_chars")]
    pub max_curriculum_chars: usize,
    #[serde(default = "default_max_roster_chars")]
    pub max_roster_chars: usize,
}

impl Default for IngestSection {
    fn default() -> Self {
        Self {
            max_curriculum_chars: default_max_curriculum_chars(),
            max_roster_chars: default_max_roster_chars(),
        }
    }
}

fn default_max_curriculum_chars() -> usize {
    100_000
}

fn default_max_roster_chars() -> usize {
    30_000
}

/// 从 config 目录加载配置，环境变量 AULA__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 AULA__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("AULA")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
