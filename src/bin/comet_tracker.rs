//! Comet Tracker - one tracking pass per invocation
//!
//! Loads the catalog, probes MPC for new and renamed comets, refreshes
//! brightness averages, saves the catalog and posts Discord notifications.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin comet_tracker
//! ```
//!
//! ## Environment Variables
//!
//! - COMET_CATALOG_PATH - Catalog CSV (default: known_comets.csv)
//! - DISCORD_WEBHOOK_URL - Webhook for notifications (optional)
//! - PROBE_START_INDEX / PROBE_END_INDEX - Half-month index range (default: 1 / 5)
//! - OBSERVATION_FETCH_DELAY_MS - Delay between observation requests (default: 1000)
//! - HTTP_TIMEOUT_SECS - Request timeout (default: 10)
//! - MPC_IDENTIFIER_URL / MPC_OBSERVATIONS_URL - API endpoints
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::Utc;
use cometwatch::mpc::{MpcIdentifierClient, MpcObservationsClient};
use cometwatch::notify::DiscordNotifier;
use cometwatch::{CatalogStore, Tracker, TrackerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = TrackerConfig::from_env()?;

    log::info!("🚀 Starting comet tracker");
    log::info!("   Catalog: {}", config.catalog_path);
    log::info!("   Probe range: {}..={}", config.probe_start, config.probe_end);
    log::info!("   Observation fetch delay: {}ms", config.observation_fetch_delay_ms);

    let store = CatalogStore::new(&config.catalog_path);
    let mut catalog = store.load()?.catalog;
    log::info!("📖 Loaded {} known comets", catalog.len());

    let lookup = MpcIdentifierClient::new(config.identifier_url.clone(), config.http_timeout())?;
    let observations = MpcObservationsClient::new(config.observations_url.clone(), config.http_timeout())?;
    let tracker = Tracker::new(lookup, observations)
        .with_probe_range(config.probe_start, config.probe_end)
        .with_fetch_interval(config.fetch_interval());

    let now = Utc::now();
    let report = match tracker.run_pass(&mut catalog, now.date_naive(), now).await {
        Ok(report) => report,
        Err(e) => {
            log::error!("❌ Tracking pass aborted, catalog left unchanged: {}", e);
            return Err(e.into());
        }
    };

    store.save(&catalog)?;
    log::info!("💾 Saved {} comets to {}", catalog.len(), store.path().display());

    let events = report.events(&catalog);
    if events.is_empty() {
        log::info!("No notifications this pass");
        return Ok(());
    }

    let notifier = DiscordNotifier::new(config.discord_webhook_url.clone(), config.http_timeout())?;
    let delivered = notifier.send_all(&events).await;
    log::info!("✅ {} of {} notifications delivered", delivered, events.len());

    Ok(())
}
