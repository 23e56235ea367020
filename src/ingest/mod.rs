//! 导入流程：外部提取的文本 / 表格行 → 生成式文本服务 → parser → 结构化数据 → 存储
//!
//! PDF / Excel 的解析不在这里，调用方传入已提取的文本或行数据。

pub mod prompts;

use std::sync::Arc;

use serde_json::Value;

use crate::config::IngestSection;
use crate::core::IngestError;
use crate::curriculum::{CurriculumPayload, GradePlan};
use crate::llm::LlmClient;
use crate::parser;
use crate::store::{Repository, StudentLists};

pub use prompts::TextAction;

pub struct Ingestor {
    llm: Arc<dyn LlmClient>,
    limits: IngestSection,
}

impl Ingestor {
    pub fn new(llm: Arc<dyn LlmClient>, limits: IngestSection) -> Self {
        Self { llm, limits }
    }

    async fn ask_json(&self, prompt: &str, what: &str) -> Result<Value, IngestError> {
        let raw = self.llm.complete(prompt).await?;
        tracing::info!(
            model = self.llm.model_name(),
            len = raw.len(),
            "AI raw response ({}) received",
            what
        );
        Ok(parser::parse(&raw)?)
    }

    /// PDF 文本 → 一个或多个年级计划
    pub async fn curriculum(&self, pdf_text: &str) -> Result<Vec<GradePlan>, IngestError> {
        if pdf_text.trim().is_empty() {
            return Err(IngestError::EmptyInput);
        }
        let prompt = prompts::curriculum_prompt(pdf_text, self.limits.max_curriculum_chars);
        let value = self.ask_json(&prompt, "curriculum").await?;

        let plans = serde_json::from_value::<CurriculumPayload>(value)
            .map_err(|e| IngestError::Schema(e.to_string()))?
            .into_plans();
        if plans.is_empty() || plans.iter().any(|p| p.grade.trim().is_empty()) {
            return Err(IngestError::MissingGrade);
        }
        Ok(plans)
    }

    /// 导入课程并按年级合并进存储，返回更新的年级键
    pub async fn import_curriculum(
        &self,
        repo: &Repository,
        pdf_text: &str,
    ) -> Result<Vec<String>, IngestError> {
        let plans = self.curriculum(pdf_text).await?;
        Ok(repo.merge_grades(plans)?)
    }

    /// 表格行 → 按班级分组的学生名单
    pub async fn roster(&self, rows: &Value) -> Result<StudentLists, IngestError> {
        let empty = match rows {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            return Err(IngestError::EmptyInput);
        }

        let rows_json = serde_json::to_string(rows).map_err(|e| IngestError::Schema(e.to_string()))?;
        let prompt = prompts::roster_prompt(&rows_json, self.limits.max_roster_chars);
        let value = self.ask_json(&prompt, "students").await?;
        serde_json::from_value(value).map_err(|e| IngestError::Schema(e.to_string()))
    }

    /// 导入学生名单（整体替换）
    pub async fn import_roster(
        &self,
        repo: &Repository,
        rows: &Value,
    ) -> Result<StudentLists, IngestError> {
        let lists = self.roster(rows).await?;
        repo.replace_student_lists(&lists)?;
        Ok(lists)
    }

    /// 摘要 / 校对 / 扩写，返回模型原文
    pub async fn text(&self, action: TextAction, text: &str) -> Result<String, IngestError> {
        if text.trim().is_empty() {
            return Err(IngestError::EmptyInput);
        }
        tracing::debug!(%action, "processing text with AI");
        Ok(self.llm.complete(&prompts::text_prompt(action, text)).await?)
    }
}
