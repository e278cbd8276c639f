//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use enquiry_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    enquiry_infra::init_telemetry(
        config.service_name(),
        &config.base.environment,
        config.is_production(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = services::initialize_services(&config)
        .await
        .context("Failed to initialize services")?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
