use crate::core::miner::MiningSignal;
use crate::core::proof_of_work::{satisfies, DIFFICULTY};
use crate::core::{Block, Chain, Transaction};
use crate::error::Result;
use crate::storage::TransactionPool;
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of submitting a transaction to the gate. Duplicates are
/// acknowledged as success but trigger no broadcast.
#[derive(Debug, PartialEq, Eq)]
pub enum TxVerdict {
    Added,
    Duplicate,
}

/// Outcome of offering a block to the gate, in rule order. Only the first
/// two are success acknowledgments; the rest are rejections-as-data, never
/// faults.
#[derive(Debug, PartialEq, Eq)]
pub enum BlockVerdict {
    Accepted,
    AlreadyKnown,
    IndexTooLow,
    InvalidProofOfWork,
}

impl BlockVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BlockVerdict::Accepted)
    }
}

/// Chain and pool under one exclusion domain. Block acceptance appends and
/// cleans the pool as a single step; splitting the locks would admit
/// interleavings where one happens without the other.
struct Ledger {
    chain: Chain,
    pool: TransactionPool,
}

/// Cloneable handle to a node's mutable state. Every request handler and
/// the miner hold clones; all observation and mutation serializes through
/// the inner lock.
#[derive(Clone)]
pub struct NodeState {
    ledger: Arc<Mutex<Ledger>>,
    restart: MiningSignal,
}

impl NodeState {
    pub fn new() -> Result<NodeState> {
        Ok(NodeState {
            ledger: Arc::new(Mutex::new(Ledger {
                chain: Chain::new()?,
                pool: TransactionPool::new(),
            })),
            restart: MiningSignal::new(),
        })
    }

    /// The level-triggered flag raised whenever the tip advances. The
    /// miner wires this into its nonce search as the cancellation token.
    pub fn mining_signal(&self) -> MiningSignal {
        self.restart.clone()
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger
            .lock()
            .expect("Failed to acquire ledger lock - this should never happen")
    }

    /// Accept a transaction into the pool. Idempotent: a duplicate is a
    /// no-op and still acknowledged as success by callers.
    pub fn accept_transaction(&self, transaction: Transaction) -> TxVerdict {
        let mut ledger = self.ledger();
        if ledger.pool.add(transaction) {
            TxVerdict::Added
        } else {
            TxVerdict::Duplicate
        }
    }

    /// Apply the block acceptance rules in order:
    /// 1. same hash as the current tip -> already known (idempotent gossip)
    /// 2. index at or below the tip -> stale, no fork comparison
    /// 3. hash fails the difficulty prefix -> invalid proof of work
    /// 4. otherwise append, drop its transaction ids from the pool, and
    ///    raise the mining restart signal.
    ///
    /// Previous-hash linkage and transaction contents are deliberately not
    /// checked; the miner's own blocks pass through the same rules, which
    /// is what closes the race between finding a nonce and a peer block
    /// landing first.
    pub fn accept_block(&self, block: Block) -> BlockVerdict {
        let mut ledger = self.ledger();

        let (tip_index, tip_hash_matches) = {
            let tip = ledger.chain.tip();
            (tip.get_index(), tip.get_hash() == block.get_hash())
        };

        if tip_hash_matches {
            return BlockVerdict::AlreadyKnown;
        }
        if block.get_index() <= tip_index {
            return BlockVerdict::IndexTooLow;
        }
        if !satisfies(block.get_hash(), DIFFICULTY) {
            return BlockVerdict::InvalidProofOfWork;
        }

        let confirmed: Vec<String> = block
            .get_transactions()
            .iter()
            .map(|tx| tx.get_id().to_string())
            .collect();
        ledger.chain.append(block);
        let ids: Vec<&str> = confirmed.iter().map(|id| id.as_str()).collect();
        ledger.pool.remove_confirmed(&ids);

        // Raised while the lock is held: the miner clears the flag under
        // this same lock before snapshotting, so a signal can never fall
        // between its clear and its search.
        self.restart.set();
        BlockVerdict::Accepted
    }

    /// Snapshot for mining: clear the restart flag and read the tip and
    /// pool in one critical section, so any block accepted after this
    /// point re-raises the flag for the search that consumes this
    /// snapshot.
    pub fn mining_snapshot(&self) -> (u64, String, Vec<Transaction>) {
        let ledger = self.ledger();
        self.restart.clear();
        let tip = ledger.chain.tip();
        (
            tip.get_index(),
            tip.get_hash().to_string(),
            ledger.pool.snapshot(),
        )
    }

    pub fn chain_len(&self) -> usize {
        self.ledger().chain.len()
    }

    pub fn tip_hash(&self) -> String {
        self.ledger().chain.tip().get_hash().to_string()
    }

    pub fn tip_index(&self) -> u64 {
        self.ledger().chain.tip().get_index()
    }

    pub fn pool_len(&self) -> usize {
        self.ledger().pool.len()
    }

    pub fn pool_contains(&self, id: &str) -> bool {
        self.ledger().pool.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::GENESIS_HASH;
    use std::thread;

    fn tx(id: &str) -> Transaction {
        Transaction::new(
            id.to_string(),
            "C".to_string(),
            "R1".to_string(),
            10.0,
            1000.0,
        )
    }

    fn valid_block(index: u64, transactions: Vec<Transaction>, tag: &str) -> Block {
        // Hash shape only needs to pass the prefix rule; acceptance never
        // recomputes the digest.
        Block::from_parts(
            index,
            GENESIS_HASH.to_string(),
            1000.0,
            transactions,
            0,
            format!("{}{}", "0".repeat(DIFFICULTY), tag),
        )
    }

    #[test]
    fn test_accept_transaction_dedupes() {
        let state = NodeState::new().unwrap();
        assert_eq!(state.accept_transaction(tx("tx-1")), TxVerdict::Added);
        assert_eq!(state.pool_len(), 1);
        assert_eq!(state.accept_transaction(tx("tx-1")), TxVerdict::Duplicate);
        assert_eq!(state.pool_len(), 1);
    }

    #[test]
    fn test_duplicate_tip_hash_is_already_known() {
        let state = NodeState::new().unwrap();
        let block = valid_block(1, vec![], "ab");
        assert!(state.accept_block(block.clone()).is_accepted());
        assert_eq!(state.chain_len(), 2);

        assert_eq!(state.accept_block(block), BlockVerdict::AlreadyKnown);
        assert_eq!(state.chain_len(), 2);
    }

    #[test]
    fn test_stale_index_is_rejected_regardless_of_hash() {
        let state = NodeState::new().unwrap();
        assert!(state.accept_block(valid_block(1, vec![], "ab")).is_accepted());

        // Index 1 again, different hash, perfectly valid PoW: still stale.
        let competing = valid_block(1, vec![], "cd");
        assert_eq!(state.accept_block(competing), BlockVerdict::IndexTooLow);
        assert_eq!(state.chain_len(), 2);

        let zero = valid_block(0, vec![], "ef");
        assert_eq!(state.accept_block(zero), BlockVerdict::IndexTooLow);
    }

    #[test]
    fn test_invalid_proof_of_work_is_rejected() {
        let state = NodeState::new().unwrap();
        let block = Block::from_parts(
            1,
            GENESIS_HASH.to_string(),
            1000.0,
            vec![],
            0,
            "ffff0000".to_string(),
        );
        assert_eq!(state.accept_block(block), BlockVerdict::InvalidProofOfWork);
        assert_eq!(state.chain_len(), 1);
    }

    #[test]
    fn test_accepted_block_cleans_pool_by_id() {
        let state = NodeState::new().unwrap();
        state.accept_transaction(tx("tx-1"));
        state.accept_transaction(tx("tx-2"));
        state.accept_transaction(tx("tx-other"));

        let block = valid_block(1, vec![tx("tx-1"), tx("tx-2")], "ab");
        assert!(state.accept_block(block).is_accepted());

        assert!(!state.pool_contains("tx-1"));
        assert!(!state.pool_contains("tx-2"));
        assert!(state.pool_contains("tx-other"));
        assert_eq!(state.pool_len(), 1);
    }

    #[test]
    fn test_accepted_block_raises_mining_signal() {
        let state = NodeState::new().unwrap();
        let signal = state.mining_signal();
        let (tip_index, _, _) = state.mining_snapshot();
        assert_eq!(tip_index, 0);
        assert!(!signal.is_set());

        assert!(state.accept_block(valid_block(1, vec![], "ab")).is_accepted());
        assert!(signal.is_set());

        // Snapshotting again clears the level-triggered flag
        let (tip_index, tip_hash, _) = state.mining_snapshot();
        assert_eq!(tip_index, 1);
        assert_eq!(tip_hash, state.tip_hash());
        assert!(!signal.is_set());
    }

    #[test]
    fn test_rejections_do_not_raise_mining_signal() {
        let state = NodeState::new().unwrap();
        let signal = state.mining_signal();
        state.mining_snapshot();

        let bad = Block::from_parts(
            1,
            GENESIS_HASH.to_string(),
            1000.0,
            vec![],
            0,
            "ffff".to_string(),
        );
        state.accept_block(bad);
        assert!(!signal.is_set());
    }

    #[test]
    fn test_concurrent_submissions_lose_no_updates() {
        let state = NodeState::new().unwrap();
        let mut handles = vec![];
        for worker in 0..8 {
            let state = state.clone();
            handles.push(thread::spawn(move || {
                for i in 0..25 {
                    state.accept_transaction(tx(&format!("tx-{worker}-{i}")));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(state.pool_len(), 200);
    }
}
