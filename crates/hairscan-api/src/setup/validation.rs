//! Startup configuration validation

use anyhow::Result;
use hairscan_core::Config;

/// Validate configuration before any service is constructed.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.inference_endpoint.is_none() {
        tracing::warn!(
            "No inference endpoint configured; server-side analysis will use canned predictions"
        );
    }

    if config.directory_base_url.is_none() {
        tracing::info!("No subject directory configured; contact lookup will be unavailable");
    }

    Ok(())
}
