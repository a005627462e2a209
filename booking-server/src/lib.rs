//! Booking Server - 捐血活动预约服务
//!
//! # 架构概述
//!
//! 围绕一个核心构建：预约并发受理与生命周期状态机。其余部分
//! （存储、设定、邮件、HTTP 路由）都是围绕核心的可替换协作者。
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── booking/       # 领域核心：状态机、时段、引擎、扫描
//! ├── settings/      # 活动设定源（每次操作重新读取）
//! ├── store/         # 行存储抽象（SQLite / 内存）
//! ├── services/      # 邮件发送与模板
//! └── utils/         # 错误、日志、时间、验证
//! ```

pub mod api;
pub mod booking;
pub mod core;
pub mod services;
pub mod settings;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use booking::{BookingEngine, BookingStatus};
pub use core::{Config, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, init_logger};
