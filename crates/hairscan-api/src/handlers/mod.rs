pub mod analyze;
pub mod contact_lookup;
pub mod health;
pub mod list_uploads;
pub mod store_analysis;
pub mod upload_credential;
