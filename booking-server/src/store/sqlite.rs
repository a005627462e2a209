//! SQLite Store
//!
//! Handles the SQLite connection pool and migrations.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::booking::model::{Booking, BookingStatus, SummaryRow};
use crate::store::BookingStore;
use crate::utils::{AppError, AppResult};

const BOOKING_SELECT: &str =
    "SELECT id, name, email, phone, timeslot, status, updated_at, note FROM booking";

/// SQLite-backed booking store — owns the connection pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database with WAL mode and run migrations
    pub async fn new(db_path: &str) -> AppResult<Self> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn list_all(&self) -> AppResult<Vec<Booking>> {
        let sql = format!("{BOOKING_SELECT} ORDER BY rowid");
        let rows = sqlx::query_as::<_, Booking>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Booking>> {
        let sql = format!("{BOOKING_SELECT} WHERE id = ?");
        let row = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn append(&self, booking: &Booking) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO booking (id, name, email, phone, timeslot, status, updated_at, note) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&booking.id)
        .bind(&booking.name)
        .bind(&booking.email)
        .bind(&booking.phone)
        .bind(&booking.timeslot)
        .bind(booking.status)
        .bind(booking.updated_at)
        .bind(&booking.note)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
        updated_at: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query("UPDATE booking SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status)
            .bind(updated_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_summary(&self, rows: &[SummaryRow]) -> AppResult<()> {
        // 先清后写，整体替换在单个事务内完成
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM booking_summary")
            .execute(&mut *tx)
            .await?;
        for row in rows {
            sqlx::query(
                "INSERT INTO booking_summary (timeslot, booking_id, name, email, phone, status, note) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .bind(&row.timeslot)
            .bind(&row.booking_id)
            .bind(&row.name)
            .bind(&row.email)
            .bind(&row.phone)
            .bind(&row.status)
            .bind(&row.note)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::now_millis;

    fn sample(id: &str, email: &str, phone: &str, slot: &str) -> Booking {
        Booking {
            id: id.to_string(),
            name: "測試".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            timeslot: slot.to_string(),
            status: BookingStatus::Pending,
            updated_at: now_millis(),
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn append_then_scan_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("booking.db");
        let store = SqliteStore::new(path.to_str().unwrap()).await.unwrap();

        store
            .append(&sample("Q3-2026-aaaa1111", "a@example.com", "0912345678", "09:00"))
            .await
            .unwrap();
        store
            .append(&sample("Q3-2026-bbbb2222", "b@example.com", "0922345678", "09:30"))
            .await
            .unwrap();

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        // Scan preserves append order
        assert_eq!(rows[0].id, "Q3-2026-aaaa1111");
        assert_eq!(rows[1].id, "Q3-2026-bbbb2222");
        assert_eq!(rows[0].status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn update_status_hits_and_misses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("booking.db");
        let store = SqliteStore::new(path.to_str().unwrap()).await.unwrap();

        store
            .append(&sample("Q3-2026-cccc3333", "c@example.com", "0933345678", "09:00"))
            .await
            .unwrap();

        let stamp = now_millis();
        let hit = store
            .update_status("Q3-2026-cccc3333", BookingStatus::Confirmed, stamp)
            .await
            .unwrap();
        assert!(hit);

        let row = store.find_by_id("Q3-2026-cccc3333").await.unwrap().unwrap();
        assert_eq!(row.status, BookingStatus::Confirmed);
        assert_eq!(row.updated_at, stamp);

        let miss = store
            .update_status("Q9-9999-deadbeef", BookingStatus::Cancelled, stamp)
            .await
            .unwrap();
        assert!(!miss);
    }
}
