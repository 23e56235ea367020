//! 课程数据模型：年级 → 学期 → 周
//!
//! 字段名与前端 / 模型约定的 JSON 一致（camelCase）。`trimesters` 与 `weeks` 的顺序有意义，
//! 序列化往返必须保留；`schedule` 内键的顺序无关。

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 年级标识 → 年级计划，如 "2" → GradePlan
pub type CurriculumDocument = BTreeMap<String, GradePlan>;

/// 星期名（英文，首字母大写）→ 当天科目列表
pub type WeekSchedule = BTreeMap<String, Vec<String>>;

/// 一个年级的完整课程计划
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradePlan {
    /// 年级，模型通常返回 "2º" 形式
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub trimesters: Vec<Trimester>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trimester {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub weeks: Vec<WeekPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
}

/// 一周的计划
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlan {
    /// 数据中声明的周序号（从 1 开始）
    #[serde(default)]
    pub week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// "YYYY-MM-DD to YYYY-MM-DD"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<WeekSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class2: Option<String>,
}

/// 模型返回的课程：单个年级是对象，多个年级是数组，两者都要接受
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CurriculumPayload {
    Many(Vec<GradePlan>),
    One(GradePlan),
}

impl CurriculumPayload {
    pub fn into_plans(self) -> Vec<GradePlan> {
        match self {
            CurriculumPayload::Many(plans) => plans,
            CurriculumPayload::One(plan) => vec![plan],
        }
    }
}

/// 学校设置：开学日期与当前选中的年级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolSettings {
    /// ISO 日期 "YYYY-MM-DD"
    #[serde(default = "default_start_date")]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_grade: Option<String>,
}

pub(crate) fn default_start_date() -> String {
    "2025-08-25".to_string()
}

impl Default for SchoolSettings {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            selected_grade: Some("2".to_string()),
        }
    }
}

/// 对 SchoolSettings 的局部更新（未给出的字段保留原值）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolSettingsPatch {
    pub start_date: Option<String>,
    pub selected_grade: Option<String>,
}

impl SchoolSettings {
    pub fn apply(&mut self, patch: SchoolSettingsPatch) {
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(grade) = patch.selected_grade {
            self.selected_grade = Some(grade_key(&grade));
        }
    }
}

/// "2º" → "2"；去掉序数符号与空白，作为 CurriculumDocument 的键
pub fn grade_key(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(['º', '°'])
        .trim()
        .to_string()
}

const DEFAULT_CURRICULUM: &str = include_str!("../../data/default_curriculum.json");

/// 内置默认课程；存储中的课程按年级覆盖其上
pub fn default_curriculum() -> CurriculumDocument {
    serde_json::from_str(DEFAULT_CURRICULUM).unwrap_or_else(|e| {
        tracing::error!("Built-in curriculum is invalid: {}", e);
        CurriculumDocument::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_week_plan_camel_case_fields() {
        let week: WeekPlan = serde_json::from_value(json!({
            "week": 3,
            "title": "Fracciones",
            "dateRange": "2025-09-08 to 2025-09-12",
            "schedule": { "Monday": ["Matemáticas", "Arte"] },
            "class1": "Introducción",
            "class2": "Práctica"
        }))
        .unwrap();
        assert_eq!(week.week, 3);
        assert_eq!(week.date_range.as_deref(), Some("2025-09-08 to 2025-09-12"));
        assert_eq!(week.schedule.unwrap()["Monday"], vec!["Matemáticas", "Arte"]);
    }

    #[test]
    fn test_payload_accepts_object_or_array() {
        let one: CurriculumPayload =
            serde_json::from_value(json!({"grade": "2º", "trimesters": []})).unwrap();
        assert_eq!(one.into_plans().len(), 1);

        let many: CurriculumPayload = serde_json::from_value(json!([
            {"grade": "2º", "trimesters": []},
            {"grade": "3º", "trimesters": []}
        ]))
        .unwrap();
        let plans = many.into_plans();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].grade, "3º");
    }

    #[test]
    fn test_week_order_survives_round_trip() {
        let plan = GradePlan {
            grade: "2º".to_string(),
            trimesters: vec![Trimester {
                weeks: (1..=5)
                    .rev()
                    .map(|n| WeekPlan {
                        week: n,
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }],
        };
        let text = serde_json::to_string(&plan).unwrap();
        let back: GradePlan = serde_json::from_str(&text).unwrap();
        let order: Vec<u32> = back.trimesters[0].weeks.iter().map(|w| w.week).collect();
        assert_eq!(order, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_grade_key_strips_ordinal() {
        assert_eq!(grade_key("2º"), "2");
        assert_eq!(grade_key(" 5° "), "5");
        assert_eq!(grade_key("3"), "3");
    }

    #[test]
    fn test_settings_patch_keeps_missing_fields() {
        let mut settings = SchoolSettings::default();
        settings.apply(SchoolSettingsPatch {
            selected_grade: Some("4".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.start_date, "2025-08-25");
        assert_eq!(settings.selected_grade.as_deref(), Some("4"));
    }

    #[test]
    fn test_settings_patch_normalizes_grade_label() {
        let mut settings = SchoolSettings::default();
        settings.apply(SchoolSettingsPatch {
            selected_grade: Some("3º".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.selected_grade.as_deref(), Some("3"));
    }

    #[test]
    fn test_default_curriculum_loads() {
        let doc = default_curriculum();
        let plan = doc.get("2").expect("grade 2 in built-in curriculum");
        assert!(!plan.trimesters.is_empty());
    }
}
