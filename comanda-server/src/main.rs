use comanda_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment: .env first so the config sees overrides
    dotenv::dotenv().ok();
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    // 2. Logging, optionally with the rolling file appender
    let logs_dir = config.logs_dir();
    let log_dir = config
        .log_to_file
        .then(|| logs_dir.to_string_lossy().into_owned());
    init_logger_with_file(Some(&config.log_level), log_dir.as_deref());

    print_banner();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Comanda server starting"
    );

    // 3. Open the store, seed first-boot data
    let state = ServerState::initialize(&config)?;

    // 4. Serve until ctrl-c
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
