//! Append-only CSV event sink
//!
//! Row shape: `timestamp,node_id,event,details`. Offline analysis tooling
//! parses these rows and correlates "Block Mined" with "Block Received"
//! events across nodes by the hash embedded in the details field, so the
//! field order and event-kind strings are a contract.

use crate::error::Result;
use crate::utils::current_timestamp;
use log::error;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

pub const NODE_STARTED: &str = "Node Started";
pub const TRANSACTION_RECEIVED: &str = "Transaction Received";
pub const BLOCK_RECEIVED: &str = "Block Received";
pub const BLOCK_MINED: &str = "Block Mined";

pub struct EventLog {
    path: PathBuf,
    node_id: String,
    // Serializes appends from handler threads and the miner so rows never
    // interleave mid-line.
    write_guard: Mutex<()>,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>, node_id: String) -> EventLog {
        let path = path.into();
        if let Some(parent) = path.parent() {
            // Missing directory surfaces on the first append instead
            let _ = create_dir_all(parent);
        }
        EventLog {
            path,
            node_id,
            write_guard: Mutex::new(()),
        }
    }

    /// Append one event row. Failures are logged and swallowed: the event
    /// log never interferes with consensus or mining.
    pub fn record(&self, event: &str, details: &str) {
        if let Err(e) = self.append(event, details) {
            error!("Failed to log event: {e}");
        }
    }

    fn append(&self, event: &str, details: &str) -> Result<()> {
        let timestamp = current_timestamp()?;
        let row = format!(
            "{timestamp},{},{},{}",
            csv_field(&self.node_id),
            csv_field(event),
            csv_field(details)
        );

        let _guard = self
            .write_guard
            .lock()
            .expect("Failed to acquire event log lock - this should never happen");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{row}")?;
        Ok(())
    }
}

/// Quote a field only when it would otherwise break the row shape
/// (RFC 4180 style). Sender names and ids are free text.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
