use crate::core::block::{hash_with_payload, transaction_payload};
use crate::core::miner::MiningSignal;
use crate::core::{Block, Transaction};
use crate::error::Result;

/// Leading zero hex characters a block hash must exhibit. Fixed for the
/// whole process; never negotiated between peers or retargeted.
pub const DIFFICULTY: usize = 4;

/// Nonces tried between cancellation checks. Bounds wasted work after a
/// tip change without paying an atomic load per iteration.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// True iff the hash's textual form starts with `difficulty` consecutive
/// zero characters. A difficulty of 0 accepts any hash.
pub fn satisfies(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.as_bytes()[..difficulty].iter().all(|&b| b == b'0')
}

/// A block under construction. The transaction payload is canonicalized
/// once here, so the nonce search only pays for the field concatenation
/// and the digest on each attempt.
pub struct BlockTemplate {
    index: u64,
    previous_hash: String,
    timestamp: f64,
    transactions: Vec<Transaction>,
    payload: String,
}

impl BlockTemplate {
    pub fn new(
        index: u64,
        previous_hash: String,
        timestamp: f64,
        transactions: Vec<Transaction>,
    ) -> Result<BlockTemplate> {
        let payload = transaction_payload(&transactions)?;
        Ok(BlockTemplate {
            index,
            previous_hash,
            timestamp,
            transactions,
            payload,
        })
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn hash_with_nonce(&self, nonce: u64) -> String {
        hash_with_payload(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.payload,
            nonce,
        )
    }

    /// Seal the template with the nonce and hash the search settled on.
    pub fn into_block(self, nonce: u64, hash: String) -> Block {
        Block::from_parts(
            self.index,
            self.previous_hash,
            self.timestamp,
            self.transactions,
            nonce,
            hash,
        )
    }
}

/// Outcome of a nonce search. Cancellation yields no partial result.
#[derive(Debug)]
pub enum SearchOutcome {
    Found { nonce: u64, hash: String },
    Cancelled,
}

/// Search nonces from 0 upward until a satisfying hash is found or the
/// cancellation flag is observed. The flag is checked every
/// `CANCEL_CHECK_INTERVAL` nonces, so cancellation is prompt but not
/// per-iteration.
pub fn search(template: &BlockTemplate, difficulty: usize, cancel: &MiningSignal) -> SearchOutcome {
    let mut nonce: u64 = 0;
    loop {
        if nonce % CANCEL_CHECK_INTERVAL == 0 && cancel.is_set() {
            return SearchOutcome::Cancelled;
        }
        let hash = template.hash_with_nonce(nonce);
        if satisfies(&hash, difficulty) {
            return SearchOutcome::Found { nonce, hash };
        }
        nonce += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> BlockTemplate {
        let tx = Transaction::new(
            "tx-1".to_string(),
            "C".to_string(),
            "R1".to_string(),
            10.0,
            1000.0,
        );
        BlockTemplate::new(1, "0".repeat(32), 1000.0, vec![tx]).unwrap()
    }

    #[test]
    fn test_satisfies_prefix_rule() {
        assert!(satisfies("0000ab", 4));
        assert!(!satisfies("000ab0", 4));
        assert!(!satisfies("a000000", 1));
        assert!(satisfies("anything", 0));
        // Shorter than the required prefix can never satisfy it
        assert!(!satisfies("000", 4));
        assert!(!satisfies("", 1));
    }

    #[test]
    fn test_search_finds_satisfying_nonce() {
        let template = template();
        let cancel = MiningSignal::new();
        match search(&template, 2, &cancel) {
            SearchOutcome::Found { nonce, hash } => {
                assert!(satisfies(&hash, 2));
                assert_eq!(template.hash_with_nonce(nonce), hash);
            }
            SearchOutcome::Cancelled => panic!("search was not cancelled"),
        }
    }

    #[test]
    fn test_search_observes_cancellation() {
        let template = template();
        let cancel = MiningSignal::new();
        cancel.set();
        // An impossible difficulty would spin forever if the flag were
        // ignored; the pre-set flag must stop the search on entry.
        match search(&template, 64, &cancel) {
            SearchOutcome::Cancelled => {}
            SearchOutcome::Found { .. } => panic!("expected cancellation"),
        }
    }

    #[test]
    fn test_sealed_block_carries_search_result() {
        let template = template();
        let cancel = MiningSignal::new();
        let (nonce, hash) = match search(&template, 1, &cancel) {
            SearchOutcome::Found { nonce, hash } => (nonce, hash),
            SearchOutcome::Cancelled => panic!("search was not cancelled"),
        };
        let block = template.into_block(nonce, hash.clone());
        assert_eq!(block.get_nonce(), nonce);
        assert_eq!(block.get_hash(), hash);
        assert_eq!(block.compute_hash().unwrap(), hash);
    }
}
