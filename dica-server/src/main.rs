use dica_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. ambiente (dotenv, logger)
    setup_environment()?;

    print_banner();

    tracing::info!("DICA server starting...");

    // 2. configuração
    let config = Config::from_env();

    // 3. estado (banco, JWT, auditoria)
    let state = ServerState::initialize(&config).await;

    // 4. servidor HTTP (dispara as tarefas de background)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
