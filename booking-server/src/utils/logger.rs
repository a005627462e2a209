//! 日志初始化
//!
//! 控制台输出为主；设置 `LOG_DIR` 后改为按日滚动的文件输出。
//! 级别由 `LOG_LEVEL` 控制（默认 info）。

use std::path::Path;

/// 初始化全局日志订阅器
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 滚动日志目录；目录必须已存在 |
pub fn init_logger() {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|l| l.parse().ok())
        .unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Ok(dir) = std::env::var("LOG_DIR") {
        if Path::new(&dir).is_dir() {
            let file_appender = tracing_appender::rolling::daily(&dir, "booking-server");
            subscriber.with_writer(file_appender).init();
            return;
        }
        eprintln!("LOG_DIR '{dir}' is not a directory, logging to stdout");
    }

    subscriber.init();
}
