//! 错误类型
//!
//! 解析器与解析日期的逻辑只返回带标签的错误值，不 panic；调用方（导入流程、CLI）负责向用户展示。

use thiserror::Error;

use crate::llm::LlmError;

/// 结构化输出解析错误
///
/// `DirectParseFailed` / `ExtractionFailed` 只在尝试链内部出现（触发下一种策略），
/// 对外只会看到 `NoValidJson`。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Direct JSON parse failed: {0}")]
    DirectParseFailed(String),

    #[error("Extracted JSON parse failed: {0}")]
    ExtractionFailed(String),

    #[error("No valid JSON found in response: {message} (candidate length {candidate_len})")]
    NoValidJson {
        /// 第一次（直接）解析失败时的原始错误信息
        message: String,
        /// 最后一次尝试的候选文本长度（字节）
        candidate_len: usize,
    },
}

/// 课程日期解析错误：都代表课程数据缺失或格式不对，不可重试
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Datos del plan de estudios ({0}º) no encontrados.")]
    GradeNotFound(String),

    #[error("El plan de estudios de {0}º no tiene trimestres.")]
    NoTrimesterData(String),

    #[error("El plan de estudios de {0}º no tiene semanas planificadas.")]
    NoWeekData(String),

    #[error("No se encontró planificación para la fecha actual ({0}).")]
    NoMatchForDate(String),
}

/// 键值存储错误
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// 键存在但内容无法反序列化为期望的结构
    #[error("Corrupt value under key '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

/// 导入流程（PDF 文本 / 表格行 → LLM → 结构化数据）错误
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Empty input: nothing to send to the model")]
    EmptyInput,

    #[error("Model response has a grade plan without 'grade'")]
    MissingGrade,

    #[error("Unknown text action: {0}")]
    UnknownAction(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// JSON 合法但不符合期望的结构
    #[error("Response does not match the expected schema: {0}")]
    Schema(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
