use crate::core::Transaction;
use crate::error::Result;
use crate::utils::{current_timestamp, sha256_digest};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

/// Placeholder hash every node assigns its genesis block. Genesis is a
/// fixed constant shared by all nodes at startup, never produced by the
/// hashing rule.
pub const GENESIS_HASH: &str = "00000000000000000000000000000000";

/// Sentinel standing in for the predecessor hash of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// An accepted unit of the chain. Immutable once built; the hash field is
/// carried alongside the content it was derived from and trusted as-is on
/// receipt from peers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    previous_hash: String,
    timestamp: f64,
    transactions: Vec<Transaction>,
    nonce: u64,
    hash: String,
}

impl Block {
    /// The fixed chain origin: index 0, empty transaction list, nonce 0,
    /// the all-zero placeholder hash. The timestamp is this node's startup
    /// time and takes no part in cross-node identity.
    pub fn genesis() -> Result<Block> {
        Ok(Block {
            index: 0,
            previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
            timestamp: current_timestamp()?,
            transactions: vec![],
            nonce: 0,
            hash: GENESIS_HASH.to_string(),
        })
    }

    /// Reassemble a block from its wire fields, keeping the carried hash.
    pub fn from_parts(
        index: u64,
        previous_hash: String,
        timestamp: f64,
        transactions: Vec<Transaction>,
        nonce: u64,
        hash: String,
    ) -> Block {
        Block {
            index,
            previous_hash,
            timestamp,
            transactions,
            nonce,
            hash,
        }
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    /// Re-derive the digest from this block's own fields.
    pub fn compute_hash(&self) -> Result<String> {
        block_hash(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.transactions,
            self.nonce,
        )
    }
}

/// Content hash over a block's canonical fields.
pub fn block_hash(
    index: u64,
    previous_hash: &str,
    timestamp: f64,
    transactions: &[Transaction],
    nonce: u64,
) -> Result<String> {
    let payload = transaction_payload(transactions)?;
    Ok(hash_with_payload(
        index,
        previous_hash,
        timestamp,
        &payload,
        nonce,
    ))
}

/// Canonical transaction payload: each transaction rendered to its JSON
/// string, the strings sorted, the sorted list encoded as a JSON array.
/// Peers verify proof-of-work against this form without caring about the
/// order transactions arrived in.
pub(crate) fn transaction_payload(transactions: &[Transaction]) -> Result<String> {
    let mut entries = transactions
        .iter()
        .map(|tx| tx.canonical_string())
        .collect::<Result<Vec<String>>>()?;
    entries.sort();
    Ok(serde_json::to_string(&entries)?)
}

/// Digest of the concatenated canonical fields, rendered as lowercase hex.
pub(crate) fn hash_with_payload(
    index: u64,
    previous_hash: &str,
    timestamp: f64,
    payload: &str,
    nonce: u64,
) -> String {
    let data = format!("{index}{previous_hash}{timestamp}{payload}{nonce}");
    HEXLOWER.encode(sha256_digest(data.as_bytes()).as_slice())
}
