//! External collaborators of the scan-ingestion pipeline
//!
//! The inference gateway and the subject directory are remote services the
//! pipeline consumes through narrow traits. Both HTTP implementations follow
//! the same discipline: a dedicated reqwest client with an explicit timeout,
//! typed wire models, and non-2xx responses mapped into the error taxonomy.

pub mod contacts;
pub mod inference;

pub use contacts::{HttpSubjectDirectory, SubjectDirectory};
pub use inference::{FallbackDetectionClient, InferenceGateway, VertexDetectionClient};
