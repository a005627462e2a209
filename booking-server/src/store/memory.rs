//! In-memory Store
//!
//! 行为与 SQLite 实现一致的内存存储，测试夹具用。

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::booking::model::{Booking, BookingStatus, SummaryRow};
use crate::store::BookingStore;
use crate::utils::AppResult;

/// 内存版 booking store（保持追加顺序）
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Booking>>,
    summary: RwLock<Vec<SummaryRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接植入一行（测试夹具：构造历史数据，绕过 Reserve 校验）
    pub fn seed(&self, booking: Booking) {
        self.rows.write().push(booking);
    }

    /// 当前汇总投影快照
    pub fn summary_snapshot(&self) -> Vec<SummaryRow> {
        self.summary.read().clone()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        Ok(self.rows.read().clone())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Booking>> {
        Ok(self.rows.read().iter().find(|b| b.id == id).cloned())
    }

    async fn append(&self, booking: &Booking) -> AppResult<()> {
        self.rows.write().push(booking.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
        updated_at: i64,
    ) -> AppResult<bool> {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|b| b.id == id) {
            Some(row) => {
                row.status = status;
                row.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn replace_summary(&self, rows: &[SummaryRow]) -> AppResult<()> {
        *self.summary.write() = rows.to_vec();
        Ok(())
    }
}
