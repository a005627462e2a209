//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`ApiResponse`] - API 响应结构
//!
//! # 响应约定
//!
//! 所有响应都是 JSON 对象，至少带一个 `status` 字段：
//!
//! | status | 含义 |
//! |--------|------|
//! | success | 操作成功 |
//! | error | 验证失败、冲突、系统错误 |
//! | info | 无需操作（幂等提示） |
//! | canceled | 预约已处于取消状态 |
//!
//! 非 success 响应都带人类可读的 `message`。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// API 统一响应结构
///
/// ```json
/// { "status": "success", "data": { ... } }
/// { "status": "error", "message": "此時段已額滿" }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// success | error | info | canceled
    pub status: &'static str,
    /// 消息（非 success 路径必带）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 成功响应（带数据）
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data: Some(data),
        }
    }

    /// 成功响应（仅消息）
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data: None,
        }
    }

    /// 幂等提示响应（无需操作）
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            status: "info",
            message: Some(message.into()),
            data: None,
        }
    }

    /// 已取消提示响应
    pub fn canceled(message: impl Into<String>) -> Self {
        Self {
            status: "canceled",
            message: Some(message.into()),
            data: None,
        }
    }

    /// 错误响应
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
            data: None,
        }
    }
}

/// 应用错误枚举
///
/// | 分类 | 说明 | HTTP |
/// |------|------|------|
/// | Validation | 字段缺失、格式错误、时段无效 | 400 |
/// | Conflict | 联系方式重复、时段已满 | 409 |
/// | Busy | 预约锁等待超时 | 503 |
/// | NotFound | token 查无资料 | 404 |
/// | Database / Internal | 系统错误（不外泄细节） | 500 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("{0}")]
    /// 资源冲突 (409)
    Conflict(String),

    #[error("系統繁忙，請稍後再試。")]
    /// 预约锁等待超时 (503)
    Busy,

    #[error("{0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal error: {0}")]
    /// 内部错误 (500)
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Busy => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            // 5xx: 细节只进日志，不回传给调用方
            AppError::Database(detail) | AppError::Internal(detail) => {
                error!("Internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "系統發生錯誤，請稍後再試。".to_string(),
                )
            }
        };

        (status_code, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {err}"))
    }
}

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;
