//! Booking Store
//!
//! 预约行存储的抽象接口与实现。引擎只依赖 [`BookingStore`] trait：
//! 生产环境用 SQLite（[`SqliteStore`]），测试用内存实现（[`MemoryStore`]）。
//!
//! 接口刻意保持行导向：全量扫描 + 追加 + 按 id 更新 + 汇总整体替换。
//! 容量/唯一性检查都在引擎的临界区内基于 `list_all` 的新鲜读完成，
//! store 本身不承担业务校验。

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::booking::model::{Booking, BookingStatus, SummaryRow};
use crate::utils::AppResult;

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// 全量读取所有预约行（保持写入顺序）
    ///
    /// Reserve 的临界区内必须用它重读，不得信任锁外的读取结果。
    async fn list_all(&self) -> AppResult<Vec<Booking>>;

    /// 按 id 查找单行
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Booking>>;

    /// 追加一行新预约
    async fn append(&self, booking: &Booking) -> AppResult<()>;

    /// 按 id 更新状态与转换时间戳，返回是否命中
    async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
        updated_at: i64,
    ) -> AppResult<bool>;

    /// 整体替换汇总投影（先清后写）
    async fn replace_summary(&self, rows: &[SummaryRow]) -> AppResult<()>;
}
