//! Shared constants

use std::time::Duration;

/// Lifetime of an issued upload credential (presigned PUT URL).
pub const UPLOAD_CREDENTIAL_TTL: Duration = Duration::from_secs(15 * 60);

/// Server-enforced maximum page size for upload listings.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Default page size for upload listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum accepted request body size in bytes.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;
