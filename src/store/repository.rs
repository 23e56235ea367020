//! 类型化存储访问：课程、学校设置、学生名单与学生详情
//!
//! 课程文档 = 内置默认课程 + 存储中的课程（按年级覆盖）。导入新课程时只替换对应年级，
//! 其他年级保留。

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::KeyValueStore;
use crate::core::StoreError;
use crate::curriculum::{
    default_curriculum, grade_key, CurriculumDocument, GradePlan, SchoolSettings,
    SchoolSettingsPatch,
};

pub const CURRICULUM_KEY: &str = "custom_curriculum";
pub const SETTINGS_KEY: &str = "school_settings";
pub const STUDENT_LISTS_KEY: &str = "custom_student_lists";
pub const STUDENT_DETAILS_KEY: &str = "student_details";

/// 班级（如 "2A"）→ 学生姓名列表
pub type StudentLists = BTreeMap<String, Vec<String>>;

/// 单个学生的详情字段，如 "tutor" → "María"
pub type StudentDetail = BTreeMap<String, Value>;

/// 学生姓名 → 详情
pub type StudentDetails = BTreeMap<String, StudentDetail>;

pub struct Repository {
    store: Arc<dyn KeyValueStore>,
    default_settings: SchoolSettings,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            default_settings: SchoolSettings::default(),
        }
    }

    /// 存储中没有学校设置时使用的值（通常来自配置文件）
    pub fn with_default_settings(mut self, settings: SchoolSettings) -> Self {
        self.default_settings = settings;
        self
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key)? {
            None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.store.set(key, serde_json::to_value(value)?)
    }

    /// 仅存储中的课程（不含内置默认）
    pub fn stored_curriculum(&self) -> Result<CurriculumDocument, StoreError> {
        Ok(self.read(CURRICULUM_KEY)?.unwrap_or_default())
    }

    /// 内置默认课程叠加存储中的课程
    pub fn load_curriculum(&self) -> Result<CurriculumDocument, StoreError> {
        let mut doc = default_curriculum();
        doc.extend(self.stored_curriculum()?);
        Ok(doc)
    }

    /// 按年级合并导入的课程，返回写入的年级键
    pub fn merge_grades(&self, plans: Vec<GradePlan>) -> Result<Vec<String>, StoreError> {
        let mut stored = self.stored_curriculum()?;
        let mut keys = Vec::with_capacity(plans.len());
        for plan in plans {
            let key = grade_key(&plan.grade);
            tracing::info!(grade = %key, trimesters = plan.trimesters.len(), "storing grade plan");
            stored.insert(key.clone(), plan);
            keys.push(key);
        }
        self.write(CURRICULUM_KEY, &stored)?;
        Ok(keys)
    }

    pub fn school_settings(&self) -> Result<SchoolSettings, StoreError> {
        Ok(self
            .read(SETTINGS_KEY)?
            .unwrap_or_else(|| self.default_settings.clone()))
    }

    /// 局部更新学校设置并保存，返回更新后的值
    pub fn update_school_settings(
        &self,
        patch: SchoolSettingsPatch,
    ) -> Result<SchoolSettings, StoreError> {
        let mut settings = self.school_settings()?;
        settings.apply(patch);
        self.write(SETTINGS_KEY, &settings)?;
        Ok(settings)
    }

    /// 存储内容损坏时记录警告并返回空名单
    pub fn student_lists(&self) -> Result<StudentLists, StoreError> {
        match self.read(STUDENT_LISTS_KEY) {
            Ok(lists) => Ok(lists.unwrap_or_default()),
            Err(StoreError::Corrupt { reason, .. }) => {
                tracing::warn!("Error parsing saved student lists: {}", reason);
                Ok(StudentLists::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn replace_student_lists(&self, lists: &StudentLists) -> Result<(), StoreError> {
        self.write(STUDENT_LISTS_KEY, lists)
    }

    pub fn students_in(&self, class: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .student_lists()?
            .remove(class)
            .unwrap_or_default())
    }

    pub fn classes(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.student_lists()?.into_keys().collect())
    }

    pub fn student_details(&self) -> Result<StudentDetails, StoreError> {
        Ok(self.read(STUDENT_DETAILS_KEY)?.unwrap_or_default())
    }

    /// 没有记录时返回空详情
    pub fn student_detail(&self, student: &str) -> Result<StudentDetail, StoreError> {
        Ok(self
            .student_details()?
            .remove(student)
            .unwrap_or_default())
    }

    /// 设置某个学生的一个详情字段，其他字段与其他学生保持不变；返回该学生更新后的详情
    pub fn update_student_detail(
        &self,
        student: &str,
        detail: &str,
        value: Value,
    ) -> Result<StudentDetail, StoreError> {
        let mut details = self.student_details()?;
        let entry = details.entry(student.to_string()).or_default();
        entry.insert(detail.to_string(), value);
        let updated = entry.clone();
        self.write(STUDENT_DETAILS_KEY, &details)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::{Trimester, WeekPlan};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn repo() -> (Arc<MemoryStore>, Repository) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), Repository::new(store))
    }

    fn plan(grade: &str, weeks: u32) -> GradePlan {
        GradePlan {
            grade: grade.to_string(),
            trimesters: vec![Trimester {
                title: Some("Trimestre 1".to_string()),
                weeks: (1..=weeks)
                    .map(|week| WeekPlan {
                        week,
                        ..Default::default()
                    })
                    .collect(),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_load_curriculum_overlays_default() {
        let (_, repo) = repo();
        let default_weeks = repo.load_curriculum().unwrap()["2"].trimesters[0].weeks.len();

        repo.merge_grades(vec![plan("2º", 1), plan("3º", 2)]).unwrap();
        let doc = repo.load_curriculum().unwrap();
        assert_eq!(doc["2"].trimesters[0].weeks.len(), 1);
        assert_ne!(default_weeks, 1);
        assert_eq!(doc["3"].grade, "3º");
    }

    #[test]
    fn test_merge_keeps_other_grades() {
        let (_, repo) = repo();
        repo.merge_grades(vec![plan("3º", 2)]).unwrap();
        let keys = repo.merge_grades(vec![plan("4º", 1)]).unwrap();
        assert_eq!(keys, vec!["4"]);
        let stored = repo.stored_curriculum().unwrap();
        assert!(stored.contains_key("3"));
        assert!(stored.contains_key("4"));
    }

    #[test]
    fn test_corrupt_curriculum_is_reported() {
        let (store, repo) = repo();
        store.set(CURRICULUM_KEY, json!(["not", "a", "map"])).unwrap();
        assert!(matches!(
            repo.load_curriculum(),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_settings_default_and_update() {
        let (_, repo) = repo();
        let repo = repo.with_default_settings(SchoolSettings {
            start_date: "2026-08-24".to_string(),
            selected_grade: None,
        });
        assert_eq!(repo.school_settings().unwrap().start_date, "2026-08-24");

        let updated = repo
            .update_school_settings(SchoolSettingsPatch {
                selected_grade: Some("5".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.start_date, "2026-08-24");
        assert_eq!(repo.school_settings().unwrap().selected_grade.as_deref(), Some("5"));
    }

    #[test]
    fn test_student_lists() {
        let (store, repo) = repo();
        assert!(repo.classes().unwrap().is_empty());

        let mut lists = StudentLists::new();
        lists.insert("2A".to_string(), vec!["Ana López".to_string()]);
        lists.insert("2B".to_string(), vec![]);
        repo.replace_student_lists(&lists).unwrap();
        assert_eq!(repo.classes().unwrap(), vec!["2A", "2B"]);
        assert_eq!(repo.students_in("2A").unwrap(), vec!["Ana López"]);
        assert!(repo.students_in("9Z").unwrap().is_empty());

        store.set(STUDENT_LISTS_KEY, json!("garbage")).unwrap();
        assert!(repo.student_lists().unwrap().is_empty());
    }

    #[test]
    fn test_student_detail_updates_merge() {
        let (_, repo) = repo();
        assert!(repo.student_detail("Ana López").unwrap().is_empty());

        repo.update_student_detail("Ana López", "tutor", json!("María"))
            .unwrap();
        repo.update_student_detail("Luis Pérez", "alergias", json!(["nuez"]))
            .unwrap();
        let ana = repo
            .update_student_detail("Ana López", "nee", json!(true))
            .unwrap();

        assert_eq!(ana["tutor"], json!("María"));
        assert_eq!(ana["nee"], json!(true));
        assert_eq!(repo.student_detail("Ana López").unwrap(), ana);
        assert_eq!(
            repo.student_detail("Luis Pérez").unwrap()["alergias"],
            json!(["nuez"])
        );

        let overwritten = repo
            .update_student_detail("Ana López", "tutor", json!("Jorge"))
            .unwrap();
        assert_eq!(overwritten["tutor"], json!("Jorge"));
        assert_eq!(overwritten.len(), 2);
    }
}
