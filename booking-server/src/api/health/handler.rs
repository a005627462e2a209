//! Health API Handlers

use axum::Json;
use serde_json::json;

/// GET /api/health - 存活检查
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "booking-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
