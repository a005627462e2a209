//! 预约压力测试 - 并发受理下的容量与唯一性不变式
//!
//! 大量并发 Reserve 打同一组时段，验证任何交织下
//! `{pending, confirmed}` 行数都不超过名额上限。

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use chrono_tz::Tz;

use booking_server::booking::engine::{BookingEngine, ReserveRequest};
use booking_server::services::NoopMailer;
use booking_server::settings::{FixedSettings, Settings};
use booking_server::store::{BookingStore, MemoryStore};

const TZ: Tz = chrono_tz::Asia::Taipei;
const ATTEMPTS: usize = 50;
const MAX_PER_SLOT: u32 = 5;

fn stress_settings() -> Settings {
    let today = Utc::now().with_timezone(&TZ).date_naive();
    Settings {
        activity_date: today + ChronoDuration::days(14),
        start_date: today - ChronoDuration::days(1),
        booking_cutoff_date: today + ChronoDuration::days(10),
        slot_start_time: "09:00".into(),
        slot_end_time: "10:00".into(),
        slot_interval_minutes: 30,
        max_per_slot: MAX_PER_SLOT,
        activity_place: "捐血中心".into(),
        activity_map_url: String::new(),
        activity_contact: String::new(),
        promo_text: String::new(),
        promo_image: String::new(),
        promo_link: String::new(),
        second_promo_image: String::new(),
        second_promo_link: String::new(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_reserves_hold_capacity_invariant() {
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(BookingEngine::new(
        store.clone(),
        Arc::new(FixedSettings(stress_settings())),
        Arc::new(NoopMailer),
        Duration::from_secs(10),
        "https://blood-booking.vercel.app",
        TZ,
    ));

    // 50 个互不相同的联系人抢两个时段（各 5 个名额）
    let mut handles = Vec::with_capacity(ATTEMPTS);
    for i in 0..ATTEMPTS {
        let engine = Arc::clone(&engine);
        let slot = if i % 2 == 0 { "09:00" } else { "09:30" };
        let req = ReserveRequest {
            name: format!("捐血人{i}"),
            email: format!("user{i}@example.com"),
            phone: format!("09{i:08}"),
            timeslot: slot.to_string(),
        };
        handles.push(tokio::spawn(async move { engine.reserve(req).await }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    // 恰好放进两个时段的总名额，其余全部被「此時段已額滿」拒绝
    assert_eq!(successes, (MAX_PER_SLOT * 2) as usize);

    let rows = store.list_all().await.unwrap();
    for slot in ["09:00", "09:30"] {
        let active = rows
            .iter()
            .filter(|b| b.timeslot == slot && b.status.is_active())
            .count();
        assert!(
            active <= MAX_PER_SLOT as usize,
            "slot {slot} overbooked: {active}"
        );
    }

    // 唯一性不变式：活跃行之间 email / phone 两两不同
    let active: Vec<_> = rows.iter().filter(|b| b.status.is_active()).collect();
    for (i, a) in active.iter().enumerate() {
        for b in &active[i + 1..] {
            assert_ne!(a.email, b.email);
            assert_ne!(a.phone, b.phone);
        }
    }
}
