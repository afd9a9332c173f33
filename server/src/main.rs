use std::error::Error;

use tokio::net::TcpListener;
use tracing::{error, info};

use server::bootstrap::{router::create_router, shutdown::shutdown_signal, state::AppState};
use server::{config_loader, observability};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;
    observability::tracing::setup_logging(&config)?;
    info!(environment = %config.environment.env, "Starting metatile editor server");

    let state = AppState::new(config);
    let address = state.config.server_address();

    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on http://{}", address);
    observability::startup_info::print_api_info(&state.config);

    axum::serve(listener, create_router(&state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    info!("Server shutdown completed");
    Ok(())
}
