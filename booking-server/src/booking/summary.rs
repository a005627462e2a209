//! 汇总投影
//!
//! 按时段展开的值机名册：每个有效时段固定 `max_per_slot` 行，
//! 有预约的行填入联系资料，空位填占位行。每次相关变更后整体重建
//! （先清后写），不做增量维护。

use crate::booking::model::{Booking, SummaryRow};
use crate::store::BookingStore;
use crate::utils::AppResult;
use crate::utils::time::normalize_hhmm;

/// 从行集合计算完整投影（纯函数）
pub fn project(rows: &[Booking], slots: &[String], max_per_slot: u32) -> Vec<SummaryRow> {
    let mut projection = Vec::with_capacity(slots.len() * max_per_slot as usize);

    for slot in slots {
        let active: Vec<&Booking> = rows
            .iter()
            .filter(|b| b.status.is_active() && normalize_hhmm(&b.timeslot) == *slot)
            .take(max_per_slot as usize)
            .collect();

        for i in 0..max_per_slot as usize {
            match active.get(i) {
                Some(b) => projection.push(SummaryRow {
                    timeslot: slot.clone(),
                    booking_id: b.id.clone(),
                    name: b.name.clone(),
                    email: b.email.clone(),
                    phone: b.phone.clone(),
                    status: b.status.display_zh().to_string(),
                    note: b.note.clone(),
                }),
                None => projection.push(SummaryRow::placeholder(slot)),
            }
        }
    }

    projection
}

/// 重读行集合并整体替换投影
pub async fn resync(
    store: &dyn BookingStore,
    slots: &[String],
    max_per_slot: u32,
) -> AppResult<()> {
    let rows = store.list_all().await?;
    let projection = project(&rows, slots, max_per_slot);
    store.replace_summary(&projection).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::model::BookingStatus;

    fn booking(id: &str, slot: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            name: format!("捐血人{id}"),
            email: format!("{id}@example.com"),
            phone: "0912345678".to_string(),
            timeslot: slot.to_string(),
            status,
            updated_at: 0,
            note: String::new(),
        }
    }

    #[test]
    fn pads_every_slot_to_capacity() {
        let slots = vec!["09:00".to_string(), "09:30".to_string()];
        let rows = vec![booking("a", "09:00", BookingStatus::Pending)];

        let projection = project(&rows, &slots, 2);

        // 2 slots x capacity 2 = 4 rows regardless of occupancy
        assert_eq!(projection.len(), 4);
        assert_eq!(projection[0].booking_id, "a");
        assert_eq!(projection[0].status, "待確認");
        assert_eq!(projection[1], SummaryRow::placeholder("09:00"));
        assert_eq!(projection[2], SummaryRow::placeholder("09:30"));
        assert_eq!(projection[3], SummaryRow::placeholder("09:30"));
    }

    #[test]
    fn skips_inactive_rows_and_unknown_slots() {
        let slots = vec!["09:00".to_string()];
        let rows = vec![
            booking("cancelled", "09:00", BookingStatus::Cancelled),
            booking("expired", "09:00", BookingStatus::Expired),
            booking("elsewhere", "23:00", BookingStatus::Pending),
            booking("ok", "09:00", BookingStatus::Confirmed),
        ];

        let projection = project(&rows, &slots, 2);

        assert_eq!(projection.len(), 2);
        assert_eq!(projection[0].booking_id, "ok");
        assert_eq!(projection[0].status, "已確認");
        assert_eq!(projection[1], SummaryRow::placeholder("09:00"));
    }

    #[test]
    fn normalizes_stored_slot_labels() {
        let slots = vec!["09:00".to_string()];
        let rows = vec![booking("raw", "9:00", BookingStatus::Pending)];

        let projection = project(&rows, &slots, 1);
        assert_eq!(projection[0].booking_id, "raw");
    }

    #[test]
    fn keeps_store_order_and_truncates_overflow() {
        let slots = vec!["09:00".to_string()];
        let rows = vec![
            booking("first", "09:00", BookingStatus::Pending),
            booking("second", "09:00", BookingStatus::Confirmed),
            booking("third", "09:00", BookingStatus::Pending),
        ];

        let projection = project(&rows, &slots, 2);
        assert_eq!(projection.len(), 2);
        assert_eq!(projection[0].booking_id, "first");
        assert_eq!(projection[1].booking_id, "second");
    }
}
