//! Configuration module
//!
//! Environment-driven configuration for the API process. Loaded once at
//! startup via [`Config::from_env`] and validated with [`Config::validate`]
//! before any service is constructed, so misconfiguration fails fast.

use std::env;

use anyhow::{Context, Result};

use crate::constants::MAX_BODY_BYTES;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INFERENCE_TIMEOUT_SECS: u64 = 60;
const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 256;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Relational store
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Object store (upload credentials + image fetch)
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    // Inference gateway
    pub inference_endpoint: Option<String>,
    pub inference_api_token: Option<String>,
    pub inference_timeout_seconds: u64,
    // Subject directory
    pub directory_base_url: Option<String>,
    pub directory_api_token: Option<String>,
    // HTTP surface
    pub max_body_bytes: usize,
    pub http_concurrency_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = Config {
            server_port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DB_TIMEOUT_SECS),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .ok()
                .or_else(|| env::var("AWS_REGION").ok()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            inference_endpoint: env::var("INFERENCE_ENDPOINT_URL").ok(),
            inference_api_token: env::var("INFERENCE_API_TOKEN").ok(),
            inference_timeout_seconds: env::var("INFERENCE_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_INFERENCE_TIMEOUT_SECS),
            directory_base_url: env::var("DIRECTORY_BASE_URL").ok(),
            directory_api_token: env::var("DIRECTORY_API_TOKEN").ok(),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_BODY_BYTES),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT),
        };

        Ok(config)
    }

    /// Validate configuration consistency. Called once at startup.
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            anyhow::bail!("DATABASE_URL must be a postgresql:// connection string");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        if self.s3_bucket.is_none() || self.s3_region.is_none() {
            anyhow::bail!("S3_BUCKET and S3_REGION (or AWS_REGION) must be set");
        }

        if self.max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must be at least 1");
        }

        if self.cors_origins.contains(&"*".to_string()) && self.is_production() {
            tracing::warn!("CORS configured to allow all origins in production");
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 3000,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            database_url: "postgresql://localhost/hairscan".to_string(),
            db_max_connections: 5,
            db_timeout_seconds: 30,
            s3_bucket: Some("scans".to_string()),
            s3_region: Some("eu-west-1".to_string()),
            s3_endpoint: None,
            inference_endpoint: None,
            inference_api_token: None,
            inference_timeout_seconds: 60,
            directory_base_url: None,
            directory_api_token: None,
            max_body_bytes: MAX_BODY_BYTES,
            http_concurrency_limit: 256,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn rejects_non_postgres_database_url() {
        let mut config = base_config();
        config.database_url = "mysql://localhost/hairscan".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_missing_object_store() {
        let mut config = base_config();
        config.s3_bucket = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_pool() {
        let mut config = base_config();
        config.db_max_connections = 0;
        assert!(config.validate().is_err());
    }
}
