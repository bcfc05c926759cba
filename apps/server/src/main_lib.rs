use std::sync::Arc;

use anyhow::Context;
use finboard_core::fetch::DedupingGateway;
use finboard_core::widgets::{DashboardService, DashboardServiceTrait};
use finboard_market_data::{DataGateway, ProviderGateway, ProviderId};
use finboard_storage_file::FileDashboardRepository;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub dashboard_service: Arc<dyn DashboardServiceTrait + Send + Sync>,
    /// Straight proxy to the providers, used by `/api/proxy`.
    pub gateway: Arc<dyn DataGateway>,
    /// Collapses identical widget and preview fetches.
    pub widget_gateway: Arc<DedupingGateway>,
}

pub fn init_tracing() {
    let log_format = std::env::var("FB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    if let Some(parent) = config.data_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
    }
    tracing::info!("Dashboard file in use: {}", config.data_path.display());

    let repository = Arc::new(FileDashboardRepository::new(&config.data_path));
    let dashboard_service = Arc::new(DashboardService::new(repository));

    let provider_gateway = ProviderGateway::from_config(&config.gateway_config());
    for provider in ProviderId::ALL {
        if !provider_gateway.is_configured(provider) {
            tracing::warn!(
                "{} is not configured; set {} to enable it",
                provider.label(),
                provider.credential_env()
            );
        }
    }
    let gateway: Arc<dyn DataGateway> = Arc::new(provider_gateway);
    let widget_gateway = Arc::new(DedupingGateway::new(gateway.clone(), config.dedupe_window));

    Ok(Arc::new(AppState {
        dashboard_service,
        gateway,
        widget_gateway,
    }))
}
