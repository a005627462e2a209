//! Booking API 模块
//!
//! 对外契约沿用旧前端的「查询型」接口：GET 按 `type` 参数分派
//! （availability / summary / confirm / cancel），POST 受理预约申请。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/booking", get(handler::query).post(handler::reserve))
}
