//! 邮件模板
//!
//! 生命周期各节点的邮件文案（确认通知、确认提醒、逾期取消、活动前提醒）。
//! 文案沿用既有前端/邮件的繁体中文措辞。

use chrono_tz::Tz;

use crate::booking::model::Booking;
use crate::services::mailer::MailMessage;
use crate::settings::Settings;
use crate::utils::time::{format_date, format_local_datetime};

/// 可点击的地图链接
///
/// 设定里的地图栏位可能是嵌入码、路线链接或非 URL 文本，这些都不适合
/// 放进邮件；此时退回用地点名称组一个 Google Maps 搜索链接。
pub fn map_link(settings: &Settings) -> String {
    let raw = settings.activity_map_url.trim();
    let lower = raw.to_lowercase();
    let unusable = raw.is_empty()
        || !(lower.starts_with("http://") || lower.starts_with("https://"))
        || raw.contains("/embed")
        || raw.contains("/dir")
        || raw.contains("googleusercontent.com");

    if !unusable {
        return raw.to_string();
    }
    if settings.activity_place.trim().is_empty() {
        return String::new();
    }
    // 查询模式 (?query=)，由 Url 负责百分号编码
    reqwest::Url::parse_with_params(
        "https://www.google.com/maps/search/",
        &[("api", "1"), ("query", settings.activity_place.trim())],
    )
    .map(|u| u.to_string())
    .unwrap_or_default()
}

fn contact_line(settings: &Settings) -> String {
    if settings.activity_contact.trim().is_empty() {
        return String::new();
    }
    format!(
        r#"<p>聯絡資訊：請私訊<a href="{}">主辦單位粉絲專頁</a></p>"#,
        settings.activity_contact.trim()
    )
}

/// 预约成功 → 确认通知（含确认/取消链接）
pub fn confirmation_mail(booking: &Booking, settings: &Settings, base_url: &str) -> MailMessage {
    let confirm_url = format!("{base_url}/confirm?token={}", booking.id);
    let cancel_url = format!("{base_url}/cancel?token={}", booking.id);
    let map = map_link(settings);

    let html = format!(
        r#"<p>親愛的 {name}，</p>
<p>感謝您使用本系統預約於 {date} 舉辦的捐血活動</p>
<p>本次捐血地點為： <a href="{map}">{place}</a></p>
<p>您已申請預約 {timeslot} 捐血時段，請點選下方連結完成確認：</p>
<p><a href="{confirm_url}">👉 點我完成預約確認</a></p>
<p>若您希望取消此次預約，可點選：<a href="{cancel_url}">取消預約</a></p>
<p>請您於預約時間<strong>10分鐘</strong>前至捐血地點完成報到</p>
<p>預約將為您保留<strong>15分鐘</strong>，若超時則將取消預約資料並需改為現場抽號碼牌</p>
<p>感謝配合，並誠摯謝謝您的熱心捐血！</p>
{contact}"#,
        name = booking.name,
        date = format_date(settings.activity_date),
        map = map,
        place = settings.activity_place,
        timeslot = booking.timeslot,
        confirm_url = confirm_url,
        cancel_url = cancel_url,
        contact = contact_line(settings),
    );

    MailMessage {
        to: booking.email.clone(),
        subject: "🩸 捐血預約確認通知".to_string(),
        html,
    }
}

/// 逾期前一日 → 确认提醒
pub fn confirm_reminder_mail(
    booking: &Booking,
    deadline_millis: i64,
    settings: &Settings,
    base_url: &str,
    tz: Tz,
) -> MailMessage {
    let confirm_url = format!("{base_url}/confirm?token={}", booking.id);
    let cancel_url = format!("{base_url}/cancel?token={}", booking.id);

    let html = format!(
        r#"<p>親愛的 {name}，</p>
<p>請盡速完成您於 <strong>{timeslot}</strong> 的捐血預約確認，確認截止日為 <strong>{deadline}</strong>：</p>
<p><a href="{confirm_url}">✅ 點我完成預約確認</a></p>
<p>若您已不克前來，可忽略此信，或點此<a href="{cancel_url}">取消預約</a>。</p>
{contact}"#,
        name = booking.name,
        timeslot = booking.timeslot,
        deadline = format_local_datetime(deadline_millis, tz),
        confirm_url = confirm_url,
        cancel_url = cancel_url,
        contact = contact_line(settings),
    );

    MailMessage {
        to: booking.email.clone(),
        subject: "🔔 捐血預約確認提醒".to_string(),
        html,
    }
}

/// 逾期未确认 → 自动取消通知
pub fn overdue_mail(booking: &Booking, settings: &Settings, base_url: &str) -> MailMessage {
    let html = format!(
        r#"<p>親愛的 {name}，</p>
<p>由於您未於期限內完成捐血活動的預約確認，您預約的 <strong>{timeslot}</strong> 時段已被系統自動取消。</p>
<p>若仍想參與，可<a href="{base_url}">重新預約</a>尚有空位的時段。感謝您的支持！</p>
{contact}"#,
        name = booking.name,
        timeslot = booking.timeslot,
        base_url = base_url,
        contact = contact_line(settings),
    );

    MailMessage {
        to: booking.email.clone(),
        subject: "❌ 預約已取消（逾期未確認）".to_string(),
        html,
    }
}

/// 活动前一日 → 已确认者提醒
pub fn event_reminder_mail(booking: &Booking, settings: &Settings) -> MailMessage {
    let map = map_link(settings);

    let html = format!(
        r#"<p>親愛的 {name}，</p>
<p>感謝您預約參加我們的捐血活動！以下為明日活動資訊，請準時前往：</p>
<ul>
  <li><strong>預約時段：</strong> {timeslot}</li>
  <li><strong>活動地點：</strong> <a href="{map}">{place}</a></li>
</ul>
<p>若您無法前來，請儘早告知以便釋出名額。</p>
<p>謝謝您支持捐血活動，期待與您見面！</p>
{contact}"#,
        name = booking.name,
        timeslot = booking.timeslot,
        map = map,
        place = settings.activity_place,
        contact = contact_line(settings),
    );

    MailMessage {
        to: booking.email.clone(),
        subject: "📢 捐血提醒通知（明日活動）".to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn settings_with_map(map_url: &str, place: &str) -> Settings {
        Settings {
            activity_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            booking_cutoff_date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            slot_start_time: "09:00".into(),
            slot_end_time: "12:00".into(),
            slot_interval_minutes: 30,
            max_per_slot: 3,
            activity_place: place.into(),
            activity_map_url: map_url.into(),
            activity_contact: String::new(),
            promo_text: String::new(),
            promo_image: String::new(),
            promo_link: String::new(),
            second_promo_image: String::new(),
            second_promo_link: String::new(),
        }
    }

    #[test]
    fn map_link_keeps_plain_https_url() {
        let s = settings_with_map("https://maps.app.goo.gl/abc123", "台北車站");
        assert_eq!(map_link(&s), "https://maps.app.goo.gl/abc123");
    }

    #[test]
    fn map_link_rewrites_embed_and_dir_urls() {
        for bad in [
            "https://www.google.com/maps/embed?pb=xyz",
            "https://www.google.com/maps/dir/a/b",
            "https://lh3.googleusercontent.com/d/abc",
            "not a url",
            "",
        ] {
            let s = settings_with_map(bad, "台北車站");
            let link = map_link(&s);
            assert!(
                link.starts_with("https://www.google.com/maps/search/"),
                "unexpected link for {bad:?}: {link}"
            );
            // Place name is percent-encoded into the query
            assert!(link.contains("query="));
        }
    }

    #[test]
    fn map_link_empty_without_place_fallback() {
        let s = settings_with_map("", "");
        assert_eq!(map_link(&s), "");
    }
}
