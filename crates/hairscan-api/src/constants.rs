//! API-level constants

/// URL prefix for all versioned API routes.
pub const API_PREFIX: &str = "/api/v0";
