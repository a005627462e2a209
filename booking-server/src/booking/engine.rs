//! 预约生命周期引擎
//!
//! 系统的核心：受理（Reserve）、确认/取消（Transition）、容量查询
//! （availability）、截止日计算与逾期/提醒扫描。
//!
//! # 并发纪律
//!
//! 共享可变资源只有 booking 行存储。Reserve 的 读-检-写 序列必须在
//! `reservation_lock` 临界区内完成：
//!
//! 1. 带超时地获取锁（等待超时 → 回报「系統繁忙」，锁不会被持有）
//! 2. 锁内重读全量行集合 — 锁外的读取结果一概不信任
//! 3. 唯一性 / 容量检查 → 追加新行 → 同步重建汇总投影
//! 4. 锁释放依赖 RAII guard，任何提前 return（`?`）都会随作用域释放
//! 5. 邮件发送一律在 guard 作用域之外
//!
//! Transition 与扫描是按 id 的单行更新，不取预约锁，接受 last-writer-wins
//! （状态单调走向终态，不会造成超额预约）。

use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::booking::model::{Booking, BookingStatus};
use crate::booking::slots::generate_time_slots;
use crate::booking::summary;
use crate::services::mailer::{MailMessage, Notifier};
use crate::services::templates;
use crate::settings::{Settings, SettingsProvider};
use crate::store::BookingStore;
use crate::utils::time::{format_date, local_midnight_millis, local_today, now_millis};
use crate::utils::validation::{MAX_NAME_LEN, is_valid_email, is_valid_phone};
use crate::utils::{AppError, AppResult};

/// 确认窗口：建立后 7 天内须完成确认（与预约截止日取较早者）
pub const CONFIRM_WINDOW_DAYS: i64 = 7;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// 预约申请（POST body）
#[derive(Debug, Clone, Deserialize)]
pub struct ReserveRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub timeslot: String,
}

/// Transition 操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    Confirm,
    Cancel,
}

/// Transition 结果
///
/// 「查无此 token」是错误（NotFound）；这里的变体都是查到行之后的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// pending → confirmed
    Confirmed,
    /// pending/confirmed → cancelled
    Cancelled,
    /// confirm 到已取消的预约：提示性结果，非错误
    AlreadyCancelled,
    /// 其余组合：无需操作
    NoActionNeeded,
}

/// 活动资讯（availability 回传给前端的展示栏位）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInfo {
    pub date: String,
    pub booking_cutoff_date: String,
    pub place: String,
    /// 原样回传设定里的地图栏位，前端自行处理
    pub place_map_url: String,
    pub contact: String,
    pub start_date: String,
    pub promo_image: String,
    pub promo_link: String,
    pub second_promo_image: String,
    pub second_promo_link: String,
    pub promo_text: String,
}

/// availability 查询结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    /// 各时段剩余名额（BTreeMap 保证 HH:MM 的规范顺序）
    pub remaining: std::collections::BTreeMap<String, u32>,
    /// 现在 >= 预约截止日
    pub booking_closed: bool,
    /// 现在 < 预约开放日
    pub not_yet_open: bool,
    pub activity_info: ActivityInfo,
}

/// summary 查询结果：预约明细 + 确认截止时间
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    pub booking_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub timeslot: String,
    /// 中文状态标签（前端既有契约）
    pub status: String,
    /// ISO-8601 (UTC)
    pub deadline: String,
}

/// 逾期扫描结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirySweepReport {
    /// 发出的确认提醒数（days_left == 1，不变更状态）
    pub reminded: usize,
    /// 标记为逾期并发出取消通知的行数
    pub expired: usize,
}

/// 确认截止时间：min(建立时间 + 7 天, 预约截止日当地午夜)
pub fn deadline_millis(created_at_millis: i64, cutoff_midnight_millis: i64) -> i64 {
    (created_at_millis + CONFIRM_WINDOW_DAYS * DAY_MILLIS).min(cutoff_midnight_millis)
}

/// 预约生命周期引擎
pub struct BookingEngine {
    store: Arc<dyn BookingStore>,
    settings: Arc<dyn SettingsProvider>,
    notifier: Arc<dyn Notifier>,
    /// Reserve 读-检-写 序列的互斥锁
    reservation_lock: Mutex<()>,
    lock_wait: Duration,
    /// 确认/取消链接的前端站点
    base_url: String,
    tz: Tz,
}

impl BookingEngine {
    pub fn new(
        store: Arc<dyn BookingStore>,
        settings: Arc<dyn SettingsProvider>,
        notifier: Arc<dyn Notifier>,
        lock_wait: Duration,
        base_url: impl Into<String>,
        tz: Tz,
    ) -> Self {
        Self {
            store,
            settings,
            notifier,
            reservation_lock: Mutex::new(()),
            lock_wait,
            base_url: base_url.into(),
            tz,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    // ========================================================================
    // Reserve
    // ========================================================================

    /// 受理一笔预约申请
    ///
    /// 成功时返回新预约的 id；确认邮件在锁外发送，失败只记日志。
    pub async fn reserve(&self, req: ReserveRequest) -> AppResult<String> {
        let name = req.name.trim().to_string();
        let email = req.email.trim().to_string();
        let phone = req.phone.trim().to_string();
        let timeslot = req.timeslot.trim().to_string();

        // 结构性验证在取锁之前：不需要共享状态
        if name.is_empty() || email.is_empty() || phone.is_empty() || timeslot.is_empty() {
            return Err(AppError::validation("缺少必要欄位"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::validation("姓名過長，請重新輸入"));
        }
        if !is_valid_email(&email) {
            return Err(AppError::validation("Email 格式不正確，請重新輸入"));
        }
        if !is_valid_phone(&phone) {
            return Err(AppError::validation("電話格式不正確"));
        }

        let settings = self.settings.load().await?;
        let slots = generate_time_slots(&settings);
        if !slots.iter().any(|s| s == &timeslot) {
            return Err(AppError::validation("時段無效，請重新選擇"));
        }

        // 临界区：带超时取锁；guard 在任何 return 路径上都会释放
        let guard = tokio::time::timeout(self.lock_wait, self.reservation_lock.lock())
            .await
            .map_err(|_| AppError::Busy)?;

        // 锁内重读，锁外的检查结果一概不信任
        let rows = self.store.list_all().await?;

        let email_exists = rows
            .iter()
            .any(|b| b.email == email && !b.status.is_terminal_inactive());
        let phone_exists = rows
            .iter()
            .any(|b| b.phone == phone && !b.status.is_terminal_inactive());
        if email_exists || phone_exists {
            let field = match (email_exists, phone_exists) {
                (true, true) => "電子郵件與電話",
                (true, false) => "電子郵件",
                _ => "電話",
            };
            return Err(AppError::conflict(format!("此{field}已預約過")));
        }

        let current_count = rows
            .iter()
            .filter(|b| b.timeslot == timeslot && b.status.is_active())
            .count();
        if current_count >= settings.max_per_slot as usize {
            return Err(AppError::conflict("此時段已額滿"));
        }

        let booking = Booking {
            id: self.generate_booking_id(),
            name,
            email,
            phone,
            timeslot,
            status: BookingStatus::Pending,
            updated_at: now_millis(),
            note: String::new(),
        };
        self.store.append(&booking).await?;
        summary::resync(self.store.as_ref(), &slots, settings.max_per_slot).await?;

        drop(guard);

        // 邮件发送绝不在持锁期间进行
        self.send_mail(templates::confirmation_mail(&booking, &settings, &self.base_url))
            .await;

        tracing::info!(id = %booking.id, timeslot = %booking.timeslot, "Reservation admitted");
        Ok(booking.id)
    }

    /// 预约编号：季度-年份-随机后缀，如 `Q3-2026-1a2b3c4d`
    fn generate_booking_id(&self) -> String {
        let today = local_today(self.tz);
        let quarter = (today.month() + 2) / 3;
        let suffix = Uuid::new_v4().simple().to_string();
        format!("Q{}-{}-{}", quarter, today.year(), &suffix[..8])
    }

    // ========================================================================
    // Transition (confirm / cancel)
    // ========================================================================

    /// 按显式转换表执行确认/取消
    ///
    /// 单行按 id 更新，不取预约锁。逾期扫描与用户点击确认可能在同一行上
    /// 竞争，语义为 last-writer-wins；两端都只会把行移出
    /// `{pending, confirmed}`，容量计数不会因此超额。
    pub async fn transition(
        &self,
        token: &str,
        action: TransitionAction,
    ) -> AppResult<TransitionOutcome> {
        let booking = self
            .store
            .find_by_id(token)
            .await?
            .ok_or_else(|| AppError::not_found("查無預約資料"))?;

        let next = match (action, booking.status) {
            (TransitionAction::Confirm, BookingStatus::Pending) => BookingStatus::Confirmed,
            (TransitionAction::Confirm, BookingStatus::Cancelled) => {
                return Ok(TransitionOutcome::AlreadyCancelled);
            }
            (TransitionAction::Cancel, BookingStatus::Pending | BookingStatus::Confirmed) => {
                BookingStatus::Cancelled
            }
            _ => return Ok(TransitionOutcome::NoActionNeeded),
        };

        self.store
            .update_status(&booking.id, next, now_millis())
            .await?;
        self.resync_summary().await?;

        tracing::info!(id = %booking.id, from = %booking.status, to = %next, "Booking transitioned");
        Ok(match next {
            BookingStatus::Confirmed => TransitionOutcome::Confirmed,
            _ => TransitionOutcome::Cancelled,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// 各时段剩余名额 + 预约窗口状态 + 活动资讯
    pub async fn availability(&self) -> AppResult<AvailabilityReport> {
        let settings = self.settings.load().await?;
        let slots = generate_time_slots(&settings);
        let rows = self.store.list_all().await?;
        let now = now_millis();

        let mut remaining: std::collections::BTreeMap<String, u32> = slots
            .iter()
            .map(|s| (s.clone(), settings.max_per_slot))
            .collect();
        for row in &rows {
            if !row.status.is_active() {
                continue;
            }
            // 比对前规范化存储值（历史数据可能有 `9:00` 这类写法）
            let slot = crate::utils::time::normalize_hhmm(&row.timeslot);
            if let Some(count) = remaining.get_mut(&slot) {
                *count = count.saturating_sub(1);
            }
        }

        let booking_closed = now >= local_midnight_millis(settings.booking_cutoff_date, self.tz);
        let not_yet_open = now < local_midnight_millis(settings.start_date, self.tz);

        Ok(AvailabilityReport {
            remaining,
            booking_closed,
            not_yet_open,
            activity_info: ActivityInfo {
                date: format_date(settings.activity_date),
                booking_cutoff_date: format_date(settings.booking_cutoff_date),
                place: settings.activity_place.clone(),
                place_map_url: settings.activity_map_url.clone(),
                contact: settings.activity_contact.clone(),
                start_date: format_date(settings.start_date),
                promo_image: settings.promo_image.clone(),
                promo_link: settings.promo_link.clone(),
                second_promo_image: settings.second_promo_image.clone(),
                second_promo_link: settings.second_promo_link.clone(),
                promo_text: settings.promo_text.clone(),
            },
        })
    }

    /// 按 token 查询预约明细与确认截止时间
    pub async fn summary(&self, token: &str) -> AppResult<BookingDetail> {
        let booking = self
            .store
            .find_by_id(token)
            .await?
            .ok_or_else(|| AppError::not_found("查無預約資料"))?;
        let settings = self.settings.load().await?;

        let deadline = self.deadline_for(&booking, &settings);
        let deadline_iso = chrono::DateTime::from_timestamp_millis(deadline)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        Ok(BookingDetail {
            booking_id: booking.id,
            name: booking.name,
            email: booking.email,
            phone: booking.phone,
            timeslot: booking.timeslot,
            status: booking.status.display_zh().to_string(),
            deadline: deadline_iso,
        })
    }

    fn deadline_for(&self, booking: &Booking, settings: &Settings) -> i64 {
        let cutoff = local_midnight_millis(settings.booking_cutoff_date, self.tz);
        deadline_millis(booking.updated_at, cutoff)
    }

    // ========================================================================
    // Sweeps
    // ========================================================================

    /// 逾期扫描：pending 行的截止提醒与自动逾期
    ///
    /// 每日执行一次（days_left == 1 的提醒依赖这一点才不会重复发送）。
    /// 不取预约锁：只把过期的 pending 行转为 expired，容量统计靠状态
    /// 过滤自然保持正确。
    pub async fn run_expiry_sweep(&self) -> AppResult<ExpirySweepReport> {
        let settings = self.settings.load().await?;
        let cutoff = local_midnight_millis(settings.booking_cutoff_date, self.tz);
        let now = now_millis();
        let rows = self.store.list_all().await?;

        let mut report = ExpirySweepReport::default();
        for booking in rows.iter().filter(|b| b.status == BookingStatus::Pending) {
            let deadline = deadline_millis(booking.updated_at, cutoff);
            let days_left = ((deadline - now) as f64 / DAY_MILLIS as f64).ceil() as i64;

            if days_left == 1 {
                self.send_mail(templates::confirm_reminder_mail(
                    booking,
                    deadline,
                    &settings,
                    &self.base_url,
                    self.tz,
                ))
                .await;
                report.reminded += 1;
            } else if days_left < 0 {
                self.store
                    .update_status(&booking.id, BookingStatus::Expired, now_millis())
                    .await?;
                self.send_mail(templates::overdue_mail(booking, &settings, &self.base_url))
                    .await;
                tracing::info!(id = %booking.id, "Booking expired (confirm deadline passed)");
                report.expired += 1;
            }
        }

        if report.expired > 0 {
            let slots = generate_time_slots(&settings);
            summary::resync(self.store.as_ref(), &slots, settings.max_per_slot).await?;
        }
        Ok(report)
    }

    /// 活动前一日提醒：对所有已确认者发送活动资讯，不变更任何状态
    pub async fn run_event_reminder_sweep(&self) -> AppResult<usize> {
        let settings = self.settings.load().await?;
        let today = local_today(self.tz);
        let reminder_day = settings.activity_date.pred_opt().unwrap_or(settings.activity_date);
        if today != reminder_day {
            return Ok(0);
        }

        let rows = self.store.list_all().await?;
        let mut sent = 0;
        for booking in rows.iter().filter(|b| b.status == BookingStatus::Confirmed) {
            self.send_mail(templates::event_reminder_mail(booking, &settings))
                .await;
            sent += 1;
        }
        if sent > 0 {
            tracing::info!(count = sent, "Event-eve reminders dispatched");
        }
        Ok(sent)
    }

    /// 发送邮件：提交后的失败只记录，不回滚、不上抛
    async fn send_mail(&self, mail: MailMessage) {
        if let Err(e) = self.notifier.send(mail).await {
            tracing::warn!("Mail dispatch failed: {e}");
        }
    }

    async fn resync_summary(&self) -> AppResult<()> {
        let settings = self.settings.load().await?;
        let slots = generate_time_slots(&settings);
        summary::resync(self.store.as_ref(), &slots, settings.max_per_slot).await
    }
}
