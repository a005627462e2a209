//! 扫描调度器
//!
//! 每日在配置的当地时刻触发一次：先跑逾期扫描，再跑活动前提醒。
//! 注册为后台任务，通过 CancellationToken 优雅关闭。
//!
//! days_left == 1 的确认提醒依赖「每日至多触发一次」这一点；
//! 重启恰好跨过触发时刻时最多重发一次，可接受。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::booking::engine::BookingEngine;

/// 每日扫描调度器
pub struct DailySweepScheduler {
    engine: Arc<BookingEngine>,
    shutdown: CancellationToken,
    /// 当地触发时刻（0-23 时）
    trigger_hour: u32,
}

impl DailySweepScheduler {
    pub fn new(engine: Arc<BookingEngine>, shutdown: CancellationToken, trigger_hour: u32) -> Self {
        Self {
            engine,
            shutdown,
            trigger_hour: trigger_hour.min(23),
        }
    }

    /// 主循环：睡到下一个当地触发时刻 → 执行两个扫描
    pub async fn run(self) {
        tracing::info!(
            "Sweep scheduler started (daily at {:02}:00 local)",
            self.trigger_hour
        );

        loop {
            let wait = self.duration_until_next_trigger();
            tokio::select! {
                _ = tokio::time::sleep(wait) => self.run_sweeps().await,
                _ = self.shutdown.cancelled() => break,
            }
        }

        tracing::info!("Sweep scheduler stopped");
    }

    fn duration_until_next_trigger(&self) -> Duration {
        let tz = self.engine.timezone();
        let now = Utc::now().with_timezone(&tz).naive_local();
        let today_trigger = now
            .date()
            .and_hms_opt(self.trigger_hour, 0, 0)
            .unwrap_or(now);
        let next = if now < today_trigger {
            today_trigger
        } else {
            today_trigger + chrono::Duration::days(1)
        };
        (next - now).to_std().unwrap_or(Duration::from_secs(60))
    }

    async fn run_sweeps(&self) {
        match self.engine.run_expiry_sweep().await {
            Ok(report) => tracing::info!(
                reminded = report.reminded,
                expired = report.expired,
                "Expiry sweep completed"
            ),
            Err(e) => tracing::error!("Expiry sweep failed: {e}"),
        }

        match self.engine.run_event_reminder_sweep().await {
            Ok(sent) => tracing::info!(sent, "Event reminder sweep completed"),
            Err(e) => tracing::error!("Event reminder sweep failed: {e}"),
        }
    }
}
