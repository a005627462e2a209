use booking_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env（若存在）并初始化日志
    let _ = dotenv::dotenv();
    init_logger();

    tracing::info!("🩸 Booking server starting...");

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 初始化服务器状态（数据库、设定源、邮件网关、引擎）
    let state = ServerState::initialize(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Initialization failed: {e}"))?;

    // 4. 启动 HTTP 服务器（Server::run 会注册后台扫描任务）
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(anyhow::anyhow!("{e}"));
    }

    Ok(())
}
