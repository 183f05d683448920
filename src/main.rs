use anyhow::Context;
use llmo_monitor::{
    config::MonitorConfig, export::export_results, gemini::GeminiClient, monitor::Monitor,
    summary::print_summary, MonitorError,
};
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// The main entry point of the application.
///
/// Loads the configuration, asks Gemini every configured query, writes the CSV report
/// and prints the mention rates.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = dotenv::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let config = MonitorConfig::from_env()
        .map_err(MonitorError::from)
        .inspect_err(|e| error!("{}", e))?;

    let client = GeminiClient::new(&config).context("failed to create Gemini client")?;

    let start_time = Instant::now();
    info!(
        model = %config.model,
        queries = config.queries.len(),
        "Starting mention monitoring"
    );

    let results = Monitor::new(client, &config).run().await;

    let exported = export_results(&results, &config.output_dir);
    if let Err(e) = &exported {
        error!("Failed to save results: {}", e);
    }

    print_summary(&results);
    info!("Processing time: {:.2?}", start_time.elapsed());

    exported.context("failed to save results")?;
    Ok(())
}
