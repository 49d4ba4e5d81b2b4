//! Integration test common infrastructure.
//!
//! Provides a harness that runs the orbit-manager binary against a
//! temporary config and database, feeding events on stdin and reading
//! effects from stdout.

pub mod bot;

#[allow(unused_imports)]
pub use bot::TestBot;

/// Chat used by most scenarios.
#[allow(dead_code)]
pub const CHAT: i64 = 2_000_000_001;

/// Developer id written into every test config.
#[allow(dead_code)]
pub const DEV: i64 = 424_242;
