use tracing::{error, info};

use sentiment_snapshot::{persistence, Settings, SnapshotAssembler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments inject the environment directly
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(settings.max_log_level())
        .init();

    info!("Starting sentiment snapshot run...");

    let assembler = SnapshotAssembler::from_settings(&settings)?;
    let snapshot = assembler.assemble().await;

    if let Err(e) = persistence::write_snapshot(&settings.output_path, &snapshot).await {
        error!("Failed to persist snapshot: {:#}", e);
        return Err(e);
    }

    info!("💾 Snapshot saved to {}", settings.output_path.display());
    info!("Result: {}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
