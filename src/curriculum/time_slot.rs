//! 日程时间段："HH:MM - HH:MM"，找出当前时刻所在的那一节

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// "08:00 - 08:50"
    pub time: String,
    #[serde(default)]
    pub label: String,
}

impl TimeSlot {
    /// 起止分钟数（当天 0 点起算）；格式不对返回 None
    pub fn bounds(&self) -> Option<(u32, u32)> {
        let (start, end) = self.time.split_once(" - ")?;
        Some((parse_minutes(start)?, parse_minutes(end)?))
    }
}

fn parse_minutes(text: &str) -> Option<u32> {
    let (hour, minute) = text.trim().split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    (hour < 24 && minute < 60).then_some(hour * 60 + minute)
}

/// 第一个满足 start <= now < end 的时间段；格式错误的时间段跳过
pub fn current_time_slot(slots: &[TimeSlot], now: NaiveTime) -> Option<&TimeSlot> {
    let minutes = now.hour() * 60 + now.minute();
    slots.iter().find(|slot| {
        slot.bounds()
            .is_some_and(|(start, end)| start <= minutes && minutes < end)
    })
}
