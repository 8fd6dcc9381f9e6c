use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use neo_backend::config;
use neo_backend::model::neo::{NasaNeoClient, NeoDashboard};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config("config.toml")?;

    // Initialize logging
    let _logging_guard =
        neo_backend::logging::init_logging(&config.log_dir, "neo-backend", &config.log_level)?;

    tracing::info!("NEO backend starting...");

    let client = NasaNeoClient::new(
        &config.base_url,
        &config.api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let dashboard = NeoDashboard::new(client, config.view_params());

    // Feed dates follow UTC, like the API's own day boundaries
    let today = Utc::now().date_naive();
    if let Err(e) = dashboard.refresh(today).await {
        tracing::error!("Feed ingestion failed: {}", e);
    }

    if let Some(id) = &config.lookup_id {
        if let Err(e) = dashboard.search(id).await {
            tracing::error!("Lookup failed: {}", e);
        }
    }

    let view = dashboard.view().await;
    let params = view.params;

    if let Some(error) = &view.error {
        tracing::error!("{}", error);
    }

    if view.stats.total > 0 {
        tracing::info!(
            "Stats: total={} hazardous={} safe={} closest={}K km",
            view.stats.total,
            view.stats.hazardous_count,
            view.stats.safe_count,
            view.stats.closest_distance_thousand_km
        );
    }

    if let Some(found) = &view.lookup {
        tracing::info!("Search result: {} ({})", found.name, found.id);
    }

    tracing::info!(
        "{} objects (range={}, filter={}, sort={})",
        view.objects.len(),
        params.date_range,
        params.filter,
        params.sort
    );
    for neo in &view.objects {
        let approach = neo.representative_approach();
        let marker = match &view.closest {
            Some(closest) if closest.id == neo.id => " [closest]",
            _ => "",
        };
        tracing::info!(
            "{} id={} hazardous={} diameter={:.3}-{:.3} km speed={:.2} km/s miss={:.0} km body={} at {}{}",
            neo.name,
            neo.id,
            neo.is_hazardous,
            neo.estimated_diameter_min_km,
            neo.estimated_diameter_max_km,
            approach.relative_velocity_km_per_sec,
            approach.miss_distance_km,
            approach.orbiting_body,
            approach.approach_timestamp,
            marker
        );
    }

    Ok(())
}
