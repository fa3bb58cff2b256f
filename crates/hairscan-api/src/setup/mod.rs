//! Application setup and initialization
//!
//! All initialization logic lives here rather than in main.rs, so tests can
//! assemble the same application with substituted collaborators.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use hairscan_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup object storage
    let storage = storage::setup_storage(&config).await?;

    // Initialize services and repositories
    let state = services::initialize_services(&config, pool, storage)?;

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
