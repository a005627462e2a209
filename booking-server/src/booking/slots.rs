//! 时段生成
//!
//! 有效时段集合是设定的纯函数，每次请求重新计算，从不持久化。
//! 输出顺序就是所有展示/比对场景的规范顺序。

use crate::settings::Settings;
use crate::utils::time::{minutes_to_hhmm, to_minutes};

/// 依设定生成有效时段标签集合
///
/// 半开区间 `[start, end)`，按间隔递增。设定不合法（时间解析失败、
/// 间隔非正、start >= end）时返回空集合 — fail-soft，不报错。
pub fn generate_time_slots(settings: &Settings) -> Vec<String> {
    let (Some(start), Some(end)) = (
        to_minutes(&settings.slot_start_time),
        to_minutes(&settings.slot_end_time),
    ) else {
        tracing::warn!("Invalid slot time settings, returning empty slot set");
        return Vec::new();
    };

    let interval = settings.slot_interval_minutes;
    if interval <= 0 || start >= end {
        tracing::warn!("Invalid slot geometry settings, returning empty slot set");
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut current = start;
    while current < end {
        slots.push(minutes_to_hhmm(current));
        current += interval as u32;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn settings(start: &str, end: &str, interval: i64) -> Settings {
        Settings {
            activity_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            booking_cutoff_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            slot_start_time: start.into(),
            slot_end_time: end.into(),
            slot_interval_minutes: interval,
            max_per_slot: 3,
            activity_place: String::new(),
            activity_map_url: String::new(),
            activity_contact: String::new(),
            promo_text: String::new(),
            promo_image: String::new(),
            promo_link: String::new(),
            second_promo_image: String::new(),
            second_promo_link: String::new(),
        }
    }

    #[test]
    fn generates_half_open_range() {
        let slots = generate_time_slots(&settings("09:00", "10:00", 30));
        assert_eq!(slots, vec!["09:00", "09:30"]);
    }

    #[test]
    fn slot_count_is_floor_of_span_over_interval() {
        // (17:15 - 09:00) / 45min = 495 / 45 = 11
        let slots = generate_time_slots(&settings("09:00", "17:15", 45));
        assert_eq!(slots.len(), 11);
        // strictly increasing, last slot start strictly before end
        for pair in slots.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(slots.last().unwrap().as_str() < "17:15");
    }

    #[test]
    fn partial_trailing_slot_is_kept_when_span_is_not_divisible() {
        // end is exclusive, so 16:40 starts even though it ends past 17:00
        let slots = generate_time_slots(&settings("16:00", "17:00", 40));
        assert_eq!(slots, vec!["16:00", "16:40"]);
    }

    #[test]
    fn malformed_settings_yield_empty_set() {
        assert!(generate_time_slots(&settings("10:00", "09:00", 30)).is_empty()); // start > end
        assert!(generate_time_slots(&settings("09:00", "09:00", 30)).is_empty()); // start == end
        assert!(generate_time_slots(&settings("09:00", "10:00", 0)).is_empty()); // zero interval
        assert!(generate_time_slots(&settings("09:00", "10:00", -15)).is_empty()); // negative interval
        assert!(generate_time_slots(&settings("nine", "10:00", 30)).is_empty()); // unparseable
        assert!(generate_time_slots(&settings("09:00", "", 30)).is_empty());
    }

    #[test]
    fn unpadded_start_time_still_parses() {
        let slots = generate_time_slots(&settings("9:00", "10:30", 30));
        assert_eq!(slots, vec!["09:00", "09:30", "10:00"]);
    }
}
