//! 课程：数据模型、日历工具、日期解析器、时间段

pub mod calendar;
pub mod model;
pub mod resolver;
pub mod time_slot;

pub use calendar::{parse_local_date, school_week, trimester_for_week, weekday_key, DateRange, SchoolWeek};
pub use model::{
    default_curriculum, grade_key, CurriculumDocument, CurriculumPayload, GradePlan,
    SchoolSettings, SchoolSettingsPatch, Trimester, WeekPlan, WeekSchedule,
};
pub use resolver::{resolve_today, ActivePlan, DayPlan, DayResolver};
pub use time_slot::{current_time_slot, TimeSlot};
