//! Booking API Handlers

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::booking::engine::{ActivityInfo, AvailabilityReport, TransitionAction};
use crate::booking::{ReserveRequest, TransitionOutcome};
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Deserialize)]
pub struct BookingQuery {
    #[serde(rename = "type")]
    pub query_type: Option<String>,
    pub token: Option<String>,
}

/// availability 响应（顶层带 bookingClosed / notYetOpen，前端既有契约）
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityResponse {
    status: &'static str,
    /// 各时段剩余名额
    data: BTreeMap<String, u32>,
    booking_closed: bool,
    not_yet_open: bool,
    activity_info: ActivityInfo,
}

impl From<AvailabilityReport> for AvailabilityResponse {
    fn from(report: AvailabilityReport) -> Self {
        Self {
            status: "success",
            data: report.remaining,
            booking_closed: report.booking_closed,
            not_yet_open: report.not_yet_open,
            activity_info: report.activity_info,
        }
    }
}

/// 受理成功响应：`{status:"success", id}`
#[derive(Serialize)]
pub struct ReserveResponse {
    status: &'static str,
    id: String,
}

/// GET /api/booking?type=... - 查询型请求入口
pub async fn query(
    State(state): State<ServerState>,
    Query(params): Query<BookingQuery>,
) -> AppResult<Response> {
    let query_type = params
        .query_type
        .as_deref()
        .ok_or_else(|| AppError::validation("缺少 type"))?;

    match query_type {
        "availability" => {
            let report = state.engine.availability().await?;
            Ok(Json(AvailabilityResponse::from(report)).into_response())
        }
        "summary" => {
            let token = require_token(&params)?;
            let detail = state.engine.summary(token).await?;
            Ok(Json(ApiResponse::success(detail)).into_response())
        }
        "confirm" => transition(&state, require_token(&params)?, TransitionAction::Confirm).await,
        "cancel" => transition(&state, require_token(&params)?, TransitionAction::Cancel).await,
        _ => Err(AppError::validation("未知的請求類型")),
    }
}

/// POST /api/booking - 受理预约申请
pub async fn reserve(
    State(state): State<ServerState>,
    Json(payload): Json<ReserveRequest>,
) -> AppResult<Json<ReserveResponse>> {
    let id = state.engine.reserve(payload).await?;
    Ok(Json(ReserveResponse {
        status: "success",
        id,
    }))
}

fn require_token(params: &BookingQuery) -> AppResult<&str> {
    params
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("缺少 token"))
}

async fn transition(
    state: &ServerState,
    token: &str,
    action: TransitionAction,
) -> AppResult<Response> {
    let outcome = state.engine.transition(token, action).await?;
    let response = match outcome {
        TransitionOutcome::Confirmed => ApiResponse::<()>::success_message("預約確認成功"),
        TransitionOutcome::Cancelled => ApiResponse::<()>::success_message("預約已取消"),
        TransitionOutcome::AlreadyCancelled => ApiResponse::<()>::canceled("預約已取消"),
        TransitionOutcome::NoActionNeeded => ApiResponse::<()>::info("狀態不需操作"),
    };
    Ok(Json(response).into_response())
}
