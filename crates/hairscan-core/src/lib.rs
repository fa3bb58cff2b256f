//! Hairscan Core Library
//!
//! Domain models, error taxonomy, configuration, and shared constants for the
//! scan-ingestion pipeline. This crate performs no I/O; persistence, storage,
//! and HTTP concerns live in the sibling crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
