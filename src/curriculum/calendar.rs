//! 日历工具：本地日期解析、周区间、按开学日期推算教学周
//!
//! 所有时间都是「本地挂钟时间」（NaiveDate / NaiveDateTime），由调用方注入，
//! 不读系统时钟也不做时区换算，因此 "2025-08-25" 永远是 8 月 25 日。

use chrono::{Datelike, NaiveDate, Weekday};

/// 每学期按 12 周近似（不看真实校历）
pub const WEEKS_PER_TRIMESTER: u32 = 12;

/// 把 "YYYY-MM-DD" 拆成年 / 月 / 日整数后构造本地日期；格式不对或日期不存在时返回 None
pub fn parse_local_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().splitn(3, '-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// 闭区间 [start 00:00:00, end 23:59:59]，以本地日历日为单位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 解析 "YYYY-MM-DD to YYYY-MM-DD"
    pub fn parse(text: &str) -> Option<Self> {
        let (start, end) = text.split_once(" to ")?;
        Some(Self {
            start: parse_local_date(start)?,
            end: parse_local_date(end)?,
        })
    }

    /// 当天的任意时刻都落在 [当天 00:00, 当天 23:59:59.999] 内，按日期比较即可
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// 由开学日期推算出的教学周与学期（均从 1 开始；开学前为 0 / 0）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchoolWeek {
    pub week: u32,
    pub trimester: u32,
}

impl SchoolWeek {
    pub const BEFORE_START: SchoolWeek = SchoolWeek {
        week: 0,
        trimester: 0,
    };
}

/// 开学日到今天相差的整天数 / 7 + 1 即为周序号
pub fn school_week(start: NaiveDate, today: NaiveDate) -> SchoolWeek {
    if today < start {
        return SchoolWeek::BEFORE_START;
    }
    let elapsed_days = (today - start).num_days();
    let week = u32::try_from(elapsed_days / 7 + 1).unwrap_or(u32::MAX);
    SchoolWeek {
        week,
        trimester: trimester_for_week(week),
    }
}

/// 1–12 → 1，13–24 → 2，25 及以后 → 3；0 表示开学前
pub fn trimester_for_week(week: u32) -> u32 {
    match week {
        0 => 0,
        w if w <= WEEKS_PER_TRIMESTER => 1,
        w if w <= WEEKS_PER_TRIMESTER * 2 => 2,
        _ => 3,
    }
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// `schedule` 中使用的星期键（英文全称）
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// 周一至周三为前半周（Bloque 1），周四、周五为后半周（Bloque 2）
pub fn is_first_half_of_week(day: NaiveDate) -> bool {
    day.weekday().number_from_monday() <= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_local_date() {
        assert_eq!(parse_local_date("2025-08-25"), Some(date(2025, 8, 25)));
        assert_eq!(parse_local_date(" 2025-8-5 "), Some(date(2025, 8, 5)));
        assert_eq!(parse_local_date("2025-02-30"), None);
        assert_eq!(parse_local_date("25/08/2025"), None);
        assert_eq!(parse_local_date(""), None);
    }

    #[test]
    fn test_date_range_parse_and_bounds() {
        let range = DateRange::parse("2025-08-25 to 2025-08-29").unwrap();
        assert!(range.contains(date(2025, 8, 25)));
        assert!(range.contains(date(2025, 8, 29)));
        assert!(!range.contains(date(2025, 8, 24)));
        assert!(!range.contains(date(2025, 8, 30)));
    }

    #[test]
    fn test_date_range_rejects_malformed() {
        assert!(DateRange::parse("2025-08-25").is_none());
        assert!(DateRange::parse("2025-08-25 - 2025-08-29").is_none());
        assert!(DateRange::parse("lunes to viernes").is_none());
    }

    #[test]
    fn test_school_week_counts_from_start() {
        let start = date(2025, 8, 25);
        assert_eq!(school_week(start, start), SchoolWeek { week: 1, trimester: 1 });
        assert_eq!(school_week(start, date(2025, 8, 31)).week, 1);
        assert_eq!(school_week(start, date(2025, 9, 1)).week, 2);
        assert_eq!(school_week(start, date(2025, 8, 24)), SchoolWeek::BEFORE_START);
    }

    #[test]
    fn test_trimester_thresholds() {
        assert_eq!(trimester_for_week(1), 1);
        assert_eq!(trimester_for_week(12), 1);
        assert_eq!(trimester_for_week(13), 2);
        assert_eq!(trimester_for_week(24), 2);
        assert_eq!(trimester_for_week(25), 3);
        assert_eq!(trimester_for_week(40), 3);
    }

    #[test]
    fn test_weekday_helpers() {
        assert!(is_weekend(Weekday::Sat));
        assert!(!is_weekend(Weekday::Fri));
        assert_eq!(weekday_key(Weekday::Tue), "Tuesday");
        // 2025-08-27 周三，2025-08-28 周四
        assert!(is_first_half_of_week(date(2025, 8, 27)));
        assert!(!is_first_half_of_week(date(2025, 8, 28)));
    }
}
