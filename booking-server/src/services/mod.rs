//! 外部服务
//!
//! - [`mailer`] - 邮件发送（Notifier trait + webhook 实现）
//! - [`templates`] - 生命周期各节点的邮件模板

pub mod mailer;
pub mod templates;

pub use mailer::{MailMessage, Notifier, NoopMailer, WebhookMailer};
