//! # Gossip Chain
//!
//! A minimal peer-to-peer proof-of-work ledger node. Each node accepts
//! transactions into a pending pool, mines them into blocks, and gossips
//! blocks and transactions to a fixed peer set; every node decides
//! independently whether to extend its own in-memory chain.
//!
//! Module layout:
//! - `core/`: blocks, transactions, the chain, proof-of-work, the
//!   consensus acceptance rules, and the mining loop
//! - `storage/`: the pending-transaction pool
//! - `network/`: JSON-over-TCP request/ack protocol, the RPC server, and
//!   the fire-and-forget peer broadcaster
//! - `eventlog/`: the append-only CSV event sink consumed by analysis
//!   tooling
//! - `config/`: environment-driven node settings
//! - `cli/`: command-line interface
//! - `error/`, `utils/`: error type and shared helpers
//!
//! Deliberately out of scope: persistence across restarts, transaction
//! signing, fork comparison/reorganization, mining rewards, and
//! difficulty retargeting.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod eventlog;
pub mod network;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use crate::core::{
    block_hash, satisfies, search, Block, BlockTemplate, BlockVerdict, Chain, Miner, MiningSignal,
    NodeState, SearchOutcome, Transaction, TxVerdict, DIFFICULTY, GENESIS_HASH,
};
pub use error::{NodeError, Result};
pub use eventlog::EventLog;
pub use network::{call, Ack, BlockMessage, PeerBroadcaster, Request, Server};
pub use storage::TransactionPool;
pub use utils::{current_timestamp, sha256_digest, short_hash};
