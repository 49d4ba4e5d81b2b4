//! Permission repository.
//!
//! Per-(user, chat) permission level, warning counter and the mute and ban
//! windows. A missing row is the default member record.

pub mod models;
pub mod queries;

pub use models::{ChatStats, UserPermission};
pub use queries::PermissionRepository;
