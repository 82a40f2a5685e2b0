/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 14/5/25
 ******************************************************************************/
use std::sync::Arc;
use tracing::{error, info};

use wadas_client::{
    application::services::DashboardServiceImpl, config::Config, utils::logger::setup_logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logger();

    // Reads WADAS_* environment variables, see src/config.rs
    let config = Arc::new(Config::new());
    info!("Configuration loaded: {}", config);

    let service = DashboardServiceImpl::from_config(Arc::clone(&config))?;
    let auth = service.authenticator();

    if auth.is_logged_in() {
        info!(
            "Session found at {}, nothing to do",
            config.storage.token_path.display()
        );
        return Ok(());
    }

    match auth.login_with(&config.credentials).await {
        Ok(()) => info!(
            "Logged in, tokens stored at {}",
            config.storage.token_path.display()
        ),
        Err(e) => error!("Login failed: {}", e),
    }

    Ok(())
}
