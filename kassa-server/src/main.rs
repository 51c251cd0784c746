use kassa_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env and logging
    setup_environment()?;

    print_banner();

    tracing::info!("Kassa receipt server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. Printer bus and orchestrator
    let state = ServerState::initialize(&config)?;

    // 4. Serve until SIGINT/SIGTERM
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
