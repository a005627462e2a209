//! Booking Model

use std::fmt;

use serde::{Deserialize, Serialize};

/// 预约状态
///
/// 状态机（显式转换表，未列出的组合一律拒绝或视为无操作）：
///
/// ```text
/// pending → confirmed            (用户点击确认链接)
/// pending → cancelled            (用户点击取消链接)
/// confirmed → cancelled          (用户点击取消链接)
/// pending → expired              (逾期扫描，自动)
/// cancelled / expired / rejected (终态，不再转换)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    /// 待確認 — 已占用名额，等待邮件确认
    Pending,
    /// 已確認
    Confirmed,
    /// 已取消
    Cancelled,
    /// 回覆逾期 — 逾期未确认，系统自动取消
    Expired,
    /// 已拒絕
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Expired => "expired",
            BookingStatus::Rejected => "rejected",
        }
    }

    /// 活跃状态：占用时段容量
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// 终态：不占名额，也不参与联系方式唯一性检查
    pub fn is_terminal_inactive(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::Expired | BookingStatus::Rejected
        )
    }

    /// 状态的中文显示（邮件与前端沿用既有文案）
    pub fn display_zh(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "待確認",
            BookingStatus::Confirmed => "已確認",
            BookingStatus::Cancelled => "已取消",
            BookingStatus::Expired => "回覆逾期",
            BookingStatus::Rejected => "已拒絕",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一笔预约（store 中的一行）
///
/// `updated_at` 在创建时写入，之后每次状态转换（确认/取消/逾期）都会覆盖，
/// 语义是「最后一次转换时间」。pending 行从未转换过，因此它同时就是创建时间，
/// 截止日计算只在 pending 行上使用该列。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub timeslot: String,
    pub status: BookingStatus,
    /// Unix millis，最后一次转换时间
    pub updated_at: i64,
    #[serde(default)]
    pub note: String,
}

/// 汇总投影行：每个时段固定 `max_per_slot` 行，空位用占位行填充
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub timeslot: String,
    pub booking_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// 中文状态标签，占位行为空字符串
    pub status: String,
    pub note: String,
}

impl SummaryRow {
    /// 空位占位行
    pub fn placeholder(timeslot: &str) -> Self {
        Self {
            timeslot: timeslot.to_string(),
            ..Self::default()
        }
    }
}
