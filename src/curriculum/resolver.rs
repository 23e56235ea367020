//! 「今天上什么课」：把当前时刻映射到课程中的某一周、某一学期
//!
//! 解析顺序：
//! 1. 周末直接返回 Weekend（不看任何数据）
//! 2. 按学期、再按周的文档顺序找第一个 `dateRange` 包含今天的周
//! 3. 找不到时，用开学日期推算周序号与学期（每学期 12 周近似）去数组里取
//!
//! 多个周的区间同时命中属于数据错误，按第一个命中处理，不做唯一性校验。

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

use crate::core::ResolveError;
use crate::curriculum::calendar::{
    is_first_half_of_week, is_weekend, parse_local_date, school_week, weekday_key, DateRange,
};
use crate::curriculum::model::{
    grade_key, CurriculumDocument, GradePlan, SchoolSettings, Trimester, WeekPlan,
};

pub const WEEKEND_MESSAGE: &str = "¡Buen fin de semana! No hay clases programadas.";
pub const DEFAULT_ACTIVITY: &str = "Actividad general";
pub const DEFAULT_FALLBACK_GRADE: &str = "2";

/// 当天计划
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DayPlan {
    Weekend {
        message: String,
    },
    Error {
        message: String,
        #[serde(skip)]
        reason: ResolveError,
    },
    Active(ActivePlan),
}

impl DayPlan {
    fn weekend() -> Self {
        DayPlan::Weekend {
            message: WEEKEND_MESSAGE.to_string(),
        }
    }

    fn error(reason: ResolveError) -> Self {
        DayPlan::Error {
            message: reason.to_string(),
            reason,
        }
    }

    pub fn as_active(&self) -> Option<&ActivePlan> {
        match self {
            DayPlan::Active(plan) => Some(plan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlan {
    /// 年级标签，如 "2º"
    pub grade: String,
    /// 周在数据中声明的序号（不是推算出的下标）
    pub week: u32,
    pub topic: String,
    pub activity: String,
    pub subjects: Vec<String>,
    pub trimester_title: String,
    pub trimester_number: u32,
}

/// 命中的周及其所在学期（学期号从 1 开始）
struct Located<'a> {
    trimester_number: u32,
    trimester: &'a Trimester,
    week: &'a WeekPlan,
}

/// 日期解析器；未设置选中年级时使用 fallback_grade
#[derive(Debug, Clone)]
pub struct DayResolver {
    fallback_grade: String,
}

impl Default for DayResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_GRADE)
    }
}

impl DayResolver {
    pub fn new(fallback_grade: impl Into<String>) -> Self {
        Self {
            fallback_grade: fallback_grade.into(),
        }
    }

    /// 解析 `now`（本地挂钟时间）对应的当天计划；数据问题以 `DayPlan::Error` 返回
    pub fn resolve_today(
        &self,
        curriculum: &CurriculumDocument,
        settings: &SchoolSettings,
        now: NaiveDateTime,
    ) -> DayPlan {
        self.try_resolve(curriculum, settings, now)
            .unwrap_or_else(DayPlan::error)
    }

    /// 带时区的时刻：取其本地日期时间，不做 UTC 换算
    pub fn resolve_at<Tz: TimeZone>(
        &self,
        curriculum: &CurriculumDocument,
        settings: &SchoolSettings,
        now: &DateTime<Tz>,
    ) -> DayPlan {
        self.resolve_today(curriculum, settings, now.naive_local())
    }

    /// 同 resolve_today，但把数据错误作为 `Err` 返回
    pub fn try_resolve(
        &self,
        curriculum: &CurriculumDocument,
        settings: &SchoolSettings,
        now: NaiveDateTime,
    ) -> Result<DayPlan, ResolveError> {
        let today = now.date();
        if is_weekend(today.weekday()) {
            return Ok(DayPlan::weekend());
        }

        // "3º" 与 "3" 指同一年级；键与标签都用去掉序数符号的形式
        let grade = settings
            .selected_grade
            .as_deref()
            .map(grade_key)
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| grade_key(&self.fallback_grade));

        let plan = curriculum
            .get(grade.as_str())
            .ok_or_else(|| ResolveError::GradeNotFound(grade.clone()))?;
        if plan.trimesters.is_empty() {
            return Err(ResolveError::NoTrimesterData(grade));
        }

        let located = match find_by_date(plan, today) {
            Some(found) => {
                tracing::debug!(
                    grade = %grade,
                    trimester = found.trimester_number,
                    week = found.week.week,
                    "resolved week by date range"
                );
                found
            }
            None => find_by_school_week(plan, settings, today).ok_or_else(|| {
                if plan.trimesters.iter().all(|t| t.weeks.is_empty()) {
                    ResolveError::NoWeekData(grade.clone())
                } else {
                    ResolveError::NoMatchForDate(today.to_string())
                }
            })?,
        };

        Ok(DayPlan::Active(build_active(&grade, &located, today)))
    }
}

/// 便捷入口：默认年级 "2"
pub fn resolve_today(
    curriculum: &CurriculumDocument,
    settings: &SchoolSettings,
    now: NaiveDateTime,
) -> DayPlan {
    DayResolver::default().resolve_today(curriculum, settings, now)
}

fn find_by_date(plan: &GradePlan, today: NaiveDate) -> Option<Located<'_>> {
    plan.trimesters
        .iter()
        .zip(1u32..)
        .find_map(|(trimester, trimester_number)| {
            trimester
                .weeks
                .iter()
                .find(|week| {
                    week.date_range
                        .as_deref()
                        .and_then(DateRange::parse)
                        .is_some_and(|range| range.contains(today))
                })
                .map(|week| Located {
                    trimester_number,
                    trimester,
                    week,
                })
        })
}

fn find_by_school_week<'a>(
    plan: &'a GradePlan,
    settings: &SchoolSettings,
    today: NaiveDate,
) -> Option<Located<'a>> {
    let Some(start) = parse_local_date(&settings.start_date) else {
        tracing::warn!(start_date = %settings.start_date, "invalid school start date");
        return None;
    };
    let computed = school_week(start, today);
    tracing::debug!(
        week = computed.week,
        trimester = computed.trimester,
        "no date range matched, using computed school week"
    );

    let trimester_index = usize::try_from(computed.trimester.checked_sub(1)?).ok()?;
    let week_index = usize::try_from(computed.week.checked_sub(1)?).ok()?;
    let trimester = plan.trimesters.get(trimester_index)?;
    let week = trimester.weeks.get(week_index)?;
    Some(Located {
        trimester_number: computed.trimester,
        trimester,
        week,
    })
}

fn build_active(grade: &str, located: &Located<'_>, today: NaiveDate) -> ActivePlan {
    let week = located.week;
    let day_key = weekday_key(today.weekday());

    let (activity, subjects) = match week.schedule.as_ref().and_then(|s| s.get(day_key)) {
        Some(subjects) => (
            format!("Clases de hoy: {}", subjects.join(", ")),
            subjects.clone(),
        ),
        None if is_first_half_of_week(today) => (
            week.class1.clone().unwrap_or_else(|| DEFAULT_ACTIVITY.to_string()),
            vec!["Bloque 1".to_string()],
        ),
        None => (
            week.class2.clone().unwrap_or_else(|| DEFAULT_ACTIVITY.to_string()),
            vec!["Bloque 2".to_string()],
        ),
    };

    ActivePlan {
        grade: format!("{grade}º"),
        week: week.week,
        topic: non_empty(week.title.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Semana {}", week.week)),
        activity,
        subjects,
        trimester_title: non_empty(located.trimester.title.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Trimestre {}", located.trimester_number)),
        trimester_number: located.trimester_number,
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
