use recibo_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv + logging)
    dotenv::dotenv().ok();

    let config = Config::from_env();
    recibo_server::init_logger_with_file(
        Some(&config.log_level),
        config.log_dir.as_deref(),
    );

    print_banner();
    tracing::info!("Recibo server starting...");

    // 2. Initialize server state (store, printer, receipt service)
    let state = ServerState::initialize(&config)?;

    // 3. Run the HTTP server until ctrl-c
    let server = Server::with_state(config, state);
    server.run().await?;

    Ok(())
}
