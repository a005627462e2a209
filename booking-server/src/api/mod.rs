//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`booking`] - 预约接口（查询型 GET + 受理 POST）

pub mod booking;
pub mod health;

use axum::Router;

use crate::core::ServerState;

/// 汇总所有 API 路由
pub fn router() -> Router<ServerState> {
    Router::new().merge(health::router()).merge(booking::router())
}
