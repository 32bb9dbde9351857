pub mod api;
pub mod calculation;
pub mod calendar;
pub mod config;
pub mod crawler;
pub mod logging;
pub mod util;

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;

use crate::{config::SETTINGS, crawler::HttpFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let settings = Arc::new(SETTINGS.clone());
    let fetcher = Arc::new(HttpFetcher::new(&settings.upstream)?);
    let app = api::router(api::AppState::new(settings.clone(), fetcher))?;

    let addr = settings.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    logging::info_console(format!(
        "stock information API listening on {}{}",
        addr,
        settings.server.normalized_prefix()
    ));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    logging::info_console("stock information API stopped".to_string());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(why) = tokio::signal::ctrl_c().await {
        logging::error_console(format!("Failed to listen for ctrl-c because {:?}", why));
    }
}
