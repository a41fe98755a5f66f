//! Utility functions shared across the node: hashing, wall-clock access,
//! and display helpers.

use crate::error::{NodeError, Result};
use ring::digest::{Context, SHA256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch as a float. Transactions and blocks carry
/// this shape on the wire; it is never validated or compared across nodes.
pub fn current_timestamp() -> Result<f64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| NodeError::Clock(format!("System time error: {e}")))?;
    Ok(duration.as_secs_f64())
}

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// First eight characters of a hash for log details. Safe on hashes shorter
/// than eight characters (unvalidated peer input can be arbitrary text).
pub fn short_hash(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}
