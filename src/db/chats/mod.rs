//! Chat repository.
//!
//! Handles chat rows: recorded owner and the settings blob.

pub mod models;
pub mod queries;

pub use models::ChatRecord;
pub use queries::ChatRepository;
