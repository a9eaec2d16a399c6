use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;
mod utils;

use api::yahoo::YahooClient;
use config::Config;
use services::{animation_service, history_service};
use utils::AppError;

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let client = YahooClient::with_base_url(config.base_url.clone(), config.request_timeout)?;
    let history = history_service::load_history(&client, &config.history_request()).await?;

    let options = config.animation_options();
    let summary = tokio::task::spawn_blocking(move || {
        animation_service::render_animation(&history, &options)
    })
    .await
    .map_err(|e| AppError::Render(format!("Render task failed: {}", e)))??;

    info!(
        "📈 Animation written to {} ({} frames)",
        summary.output_path.display(),
        summary.frames
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("index_animator=info,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting index animator v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
