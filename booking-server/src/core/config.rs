//! 服务器配置
//!
//! # 环境变量
//!
//! 所有配置项都可以通过环境变量覆盖：
//!
//! | 环境变量 | 默认值 | 说明 |
//! |----------|--------|------|
//! | HTTP_PORT | 3000 | HTTP 服务端口 |
//! | DB_PATH | booking.db | SQLite 数据库路径 |
//! | SETTINGS_PATH | settings.json | 活动设定文档路径 |
//! | PUBLIC_BASE_URL | https://blood-booking.vercel.app | 确认/取消链接指向的前端站点 |
//! | TIMEZONE | Asia/Taipei | 业务时区 |
//! | LOCK_WAIT_TIMEOUT_MS | 10000 | 预约锁等待上限(毫秒) |
//! | SWEEP_TRIGGER_HOUR | 8 | 每日扫描的当地触发时刻(0-23) |
//! | MAIL_WEBHOOK_URL | (未设置) | 邮件网关端点；未设置则只记日志 |
//!
//! 活动本身的设定（日期、时段、名额、文案）不在这里 — 那些由
//! `SETTINGS_PATH` 指向的 JSON 文档承载，每次操作重新读取。

use chrono_tz::Tz;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径
    pub db_path: String,
    /// 活动设定文档路径
    pub settings_path: String,
    /// 前端站点（邮件里的确认/取消链接前缀）
    pub public_base_url: String,
    /// 业务时区
    pub timezone: Tz,
    /// 预约锁等待上限（毫秒）
    pub lock_wait_timeout_ms: u64,
    /// 每日扫描触发时刻（当地 0-23 时）
    pub sweep_trigger_hour: u32,
    /// 邮件网关端点
    pub mail_webhook_url: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "booking.db".into()),
            settings_path: std::env::var("SETTINGS_PATH")
                .unwrap_or_else(|_| "settings.json".into()),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://blood-booking.vercel.app".into())
                .trim_end_matches('/')
                .to_string(),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|raw| {
                    raw.parse::<Tz>()
                        .map_err(|_| tracing::warn!("Unknown TIMEZONE '{raw}', falling back to Asia/Taipei"))
                        .ok()
                })
                .unwrap_or(chrono_tz::Asia::Taipei),
            lock_wait_timeout_ms: std::env::var("LOCK_WAIT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
            sweep_trigger_hour: std::env::var("SWEEP_TRIGGER_HOUR")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|h| *h < 24)
                .unwrap_or(8),
            mail_webhook_url: std::env::var("MAIL_WEBHOOK_URL").ok().filter(|s| !s.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
