//! Aula - 教师助手核心
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型
//! - **curriculum**: 课程数据模型、日历工具、「今天上什么课」解析
//! - **ingest**: PDF 文本 / 表格行 → 模型 → 结构化课程与学生名单
//! - **llm**: 生成式文本服务抽象与实现（OpenAI 兼容 / Gemini / Mock）、重试
//! - **observability**: 日志
//! - **parser**: 从模型自由文本中恢复 JSON
//! - **store**: 键值存储与类型化访问

pub mod config;
pub mod core;
pub mod curriculum;
pub mod ingest;
pub mod llm;
pub mod observability;
pub mod parser;
pub mod store;

pub use curriculum::{resolve_today, DayPlan, DayResolver};
pub use parser::parse;
