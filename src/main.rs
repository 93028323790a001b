mod api;
mod attribution;
mod config;
mod dataset;
mod models;
mod tracer;
mod writer;

use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stdout)
        .with_target(false) // cleaner logs (no module names unless needed)
        .init();

    info!("Kaspa flow tracer starting...");

    let cfg = config::load()?;
    info!("Loaded config:");
    info!("  Address: {}", cfg.address);
    info!("  API base: {}", cfg.api_base);
    info!("  Page limit: {}", cfg.page_limit);
    info!("  Cutoff: {}", cfg.cutoff);
    info!("  Mode: {:?}", cfg.mode);
    info!("  Data dir: {}", cfg.data_dir);

    info!("🔍 Fetching full transaction set for {}", cfg.address);

    let client = api::ApiClient::new(&cfg)?;
    let flows = tracer::run(&cfg, &client).await;
    info!("📥 {} total sender→recipient records collected", flows.len());

    let involving = flows.project(&cfg.address);
    if involving.is_empty() {
        info!("no transactions");
    } else {
        info!(
            "🔎 {} filtered records where {} was sender or recipient",
            involving.len(),
            cfg.address
        );
    }

    std::fs::create_dir_all(&cfg.data_dir)?;
    let stem = writer::sanitize_address(&cfg.address);
    let data_dir = Path::new(&cfg.data_dir);
    writer::write_dataset(
        &data_dir.join(format!("{stem}_all_participants.csv")),
        &flows,
    )?;
    writer::write_dataset(&data_dir.join(format!("{stem}_involving.csv")), &involving)?;

    info!("✅ Completed full transaction history export.");
    Ok(())
}
