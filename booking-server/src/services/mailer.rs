//! 邮件发送
//!
//! 部署环境没有本地 SMTP，统一经 HTTP 邮件网关发送：
//! 对配置的 webhook 端点 POST `{to, subject, html}`。
//! 引擎对发送结果只记录日志 — 已提交的状态转换不因邮件失败回滚。

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::utils::{AppError, AppResult};

/// 一封待发邮件
#[derive(Debug, Clone, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, mail: MailMessage) -> AppResult<()>;
}

/// Webhook 邮件发送器
pub struct WebhookMailer {
    client: reqwest::Client,
    endpoint: String,
}

impl WebhookMailer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookMailer {
    async fn send(&self, mail: MailMessage) -> AppResult<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&mail)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Mail webhook request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "Mail webhook returned {}",
                response.status()
            )));
        }

        tracing::debug!(to = %mail.to, subject = %mail.subject, "Mail dispatched");
        Ok(())
    }
}

/// 未配置邮件网关时的空实现（只记录日志）
pub struct NoopMailer;

#[async_trait]
impl Notifier for NoopMailer {
    async fn send(&self, mail: MailMessage) -> AppResult<()> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "Mail webhook not configured, dropping mail");
        Ok(())
    }
}

/// 记录型发送器：测试用，按顺序收集所有发出的邮件
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: parking_lot::Mutex<Vec<MailMessage>>,
}

#[cfg(test)]
#[async_trait]
impl Notifier for RecordingMailer {
    async fn send(&self, mail: MailMessage) -> AppResult<()> {
        self.sent.lock().push(mail);
        Ok(())
    }
}
