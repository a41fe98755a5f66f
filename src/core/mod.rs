//! Core node state machine
//!
//! Blocks, transactions, the in-memory chain, proof-of-work, the
//! consensus acceptance rules, and the mining loop.

pub mod block;
pub mod chain;
pub mod consensus;
pub mod miner;
pub mod proof_of_work;
pub mod transaction;

pub use block::{block_hash, Block, GENESIS_HASH, GENESIS_PREVIOUS_HASH};
pub use chain::Chain;
pub use consensus::{BlockVerdict, NodeState, TxVerdict};
pub use miner::{Miner, MiningSignal};
pub use proof_of_work::{satisfies, search, BlockTemplate, SearchOutcome, DIFFICULTY};
pub use transaction::Transaction;
