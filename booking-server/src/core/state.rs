//! 服务器状态

use std::sync::Arc;
use std::time::Duration;

use crate::booking::BookingEngine;
use crate::core::Config;
use crate::services::{Notifier, NoopMailer, WebhookMailer};
use crate::settings::JsonSettings;
use crate::store::SqliteStore;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，axum 的每个 handler 克隆一份。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | engine | 预约生命周期引擎（持有 store / settings / notifier） |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub engine: Arc<BookingEngine>,
}

impl ServerState {
    /// 初始化：打开数据库、装配设定源与邮件网关、构建引擎
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let store = Arc::new(SqliteStore::new(&config.db_path).await?);
        let settings = Arc::new(JsonSettings::new(&config.settings_path));

        let notifier: Arc<dyn Notifier> = match &config.mail_webhook_url {
            Some(url) => {
                tracing::info!("Mail webhook configured: {url}");
                Arc::new(WebhookMailer::new(url.clone()))
            }
            None => {
                tracing::warn!("MAIL_WEBHOOK_URL not set, mails will be logged and dropped");
                Arc::new(NoopMailer)
            }
        };

        let engine = Arc::new(BookingEngine::new(
            store,
            settings,
            notifier,
            Duration::from_millis(config.lock_wait_timeout_ms),
            config.public_base_url.clone(),
            config.timezone,
        ));

        Ok(Self {
            config: config.clone(),
            engine,
        })
    }
}
