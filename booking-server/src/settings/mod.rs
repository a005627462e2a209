//! 活动设定
//!
//! 设定由主办方在外部维护（JSON 文档），服务端每次操作都重新读取，
//! 不跨请求缓存 — 设定可能在两次请求之间被修改，过期的时段集合会让
//! 容量统计失真。

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{AppError, AppResult};

fn default_interval() -> i64 {
    30
}

/// 活动设定（单例，外部拥有）
///
/// 日期均为业务时区的日历日（`YYYY-MM-DD`），在计算时取当地午夜。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// 活动日期
    pub activity_date: NaiveDate,
    /// 预约开放日
    pub start_date: NaiveDate,
    /// 预约截止日
    pub booking_cutoff_date: NaiveDate,
    /// 时段起始时间 `HH:MM`
    pub slot_start_time: String,
    /// 时段结束时间 `HH:MM`（不含）
    pub slot_end_time: String,
    /// 时段间隔（分钟）
    #[serde(default = "default_interval")]
    pub slot_interval_minutes: i64,
    /// 每时段名额上限
    pub max_per_slot: u32,
    /// 活动地点
    #[serde(default)]
    pub activity_place: String,
    /// 地图链接（原样回传前端；邮件中经 map_link 清洗）
    #[serde(default)]
    pub activity_map_url: String,
    /// 联络方式（粉丝专页等链接）
    #[serde(default)]
    pub activity_contact: String,
    /// 宣传文案
    #[serde(default)]
    pub promo_text: String,
    #[serde(default)]
    pub promo_image: String,
    #[serde(default)]
    pub promo_link: String,
    #[serde(default)]
    pub second_promo_image: String,
    #[serde(default)]
    pub second_promo_link: String,
}

#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// 读取当前设定（每次调用重新读取）
    async fn load(&self) -> AppResult<Settings>;
}

/// JSON 文件设定源
pub struct JsonSettings {
    path: PathBuf,
}

impl JsonSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsProvider for JsonSettings {
    async fn load(&self) -> AppResult<Settings> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::internal(format!("Failed to read settings {}: {e}", self.path.display()))
        })?;
        let settings: Settings = serde_json::from_slice(&bytes)?;
        Ok(settings)
    }
}

/// 固定设定源（测试与本地演示用）
pub struct FixedSettings(pub Settings);

#[async_trait]
impl SettingsProvider for FixedSettings {
    async fn load(&self) -> AppResult<Settings> {
        Ok(self.0.clone())
    }
}
