//! 预约领域核心
//!
//! - [`model`] - 预约行、状态机、汇总投影行
//! - [`slots`] - 时段集合生成（设定的纯函数）
//! - [`engine`] - 生命周期引擎：受理、转换、查询、扫描
//! - [`summary`] - 汇总投影重建
//! - [`sweep`] - 每日扫描调度器

pub mod engine;
pub mod model;
pub mod slots;
pub mod summary;
pub mod sweep;


pub use engine::{BookingEngine, ReserveRequest, TransitionAction, TransitionOutcome};
pub use model::{Booking, BookingStatus, SummaryRow};
pub use sweep::DailySweepScheduler;
