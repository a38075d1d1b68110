use anyhow::Result;
use chartsync::{chart, config::Config, sheets};
use reqwest::Client;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("chart auto-update starting");

    // ─── 2) read config; fail before any network call ────────────────
    let cfg = Config::from_env()?;
    let sheet_preview: String = cfg.sheet_url.chars().take(50).collect();
    info!(chart_id = %cfg.chart_id, sheet = %sheet_preview, "configured");

    let client = Client::new();

    // ─── 3) fetch CSV from the Google Sheet ──────────────────────────
    info!("step 1: fetching sheet data");
    let csv = sheets::fetch_csv(&client, &cfg.sheet_url).await?;
    info!(bytes = csv.len(), "retrieved sheet CSV");

    // ─── 4) upload to the chart ──────────────────────────────────────
    info!("step 2: uploading data to chart");
    let status = chart::upload_data(&client, &cfg, csv).await?;
    info!(status = %status, "chart data updated");

    // ─── 5) stamp the last-updated note ──────────────────────────────
    info!("step 3: updating chart metadata");
    let timestamp = chart::update_metadata(&client, &cfg).await?;
    info!(%timestamp, "chart metadata updated");

    // ─── 6) publish ──────────────────────────────────────────────────
    info!("step 4: publishing chart");
    let public_url = chart::publish(&client, &cfg).await?;
    info!(%public_url, "chart published");

    info!("update complete");
    Ok(())
}
