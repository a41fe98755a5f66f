//! Node configuration
//!
//! Environment-driven settings behind a process-wide lazy instance,
//! matching the deployment model: one node per container, configured via
//! `NODE_ID`, `NODE_ADDRESS`, `PEERS`, and `EVENT_LOG`.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
