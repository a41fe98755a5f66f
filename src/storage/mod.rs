//! In-memory storage
//!
//! The pending-transaction pool. Chain and pool share one lock inside
//! `core::NodeState`; nothing here persists across restarts.

pub mod pool;

pub use pool::TransactionPool;
