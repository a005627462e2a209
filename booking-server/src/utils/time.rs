//! 时间工具函数 — 业务时区转换与 HH:MM 处理
//!
//! 所有日期→时间戳转换统一在这里完成，
//! store 层只接收 `i64` Unix millis。

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis → 业务时区时间
pub fn millis_to_local(millis: i64, tz: Tz) -> DateTime<Tz> {
    DateTime::from_timestamp_millis(millis)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&tz)
}

/// 业务时区的今天日期
pub fn local_today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// 日期 00:00:00 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn local_midnight_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 解析 `HH:MM` → 当日分钟数，失败返回 None
pub fn to_minutes(hhmm: &str) -> Option<u32> {
    let t = NaiveTime::parse_from_str(hhmm.trim(), "%H:%M").ok()?;
    Some(t.hour() * 60 + t.minute())
}

/// 当日分钟数 → `HH:MM`
pub fn minutes_to_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// 规范化时段标签：`9:00` → `09:00`，去除空白
///
/// 无法解析时原样返回（trim 后），由调用方的集合比对自然剔除。
pub fn normalize_hhmm(raw: &str) -> String {
    match to_minutes(raw) {
        Some(m) => minutes_to_hhmm(m),
        None => raw.trim().to_string(),
    }
}

/// 日期显示格式 `yyyy/MM/dd`（沿用前端既有约定）
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Unix millis → `yyyy/MM/dd HH:mm`（业务时区，邮件显示用）
pub fn format_local_datetime(millis: i64, tz: Tz) -> String {
    millis_to_local(millis, tz).format("%Y/%m/%d %H:%M").to_string()
}
