use crate::demo::seed_demo_data;
use chrono::{DateTime, Utc};
use gig_market::config::MarketplaceConfig;
use gig_market::error::AppError;
use gig_market::marketplace::{MarketplaceError, MarketplaceService, MemoryMarketplace};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type MemoryMarketplaceService = MarketplaceService<MemoryMarketplace>;

/// In-memory marketplace, optionally pre-populated with the demo population.
pub(crate) fn build_marketplace(
    config: MarketplaceConfig,
    now: DateTime<Utc>,
) -> Result<Arc<MemoryMarketplaceService>, AppError> {
    let store = Arc::new(MemoryMarketplace::default());
    if config.seed_demo_data {
        seed_demo_data(&store, now).map_err(MarketplaceError::from)?;
        info!("demo marketplace data loaded");
    }
    Ok(Arc::new(MarketplaceService::new(store, config)))
}
