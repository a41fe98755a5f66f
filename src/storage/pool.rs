use crate::core::Transaction;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// ( K -> transaction id, V -> Transaction )
///
/// Not-yet-confirmed transactions, keyed by id so confirmed removal is one
/// map lookup per id. The pool carries no lock of its own: it shares the
/// ledger's exclusion domain with the chain, because block acceptance must
/// append and clean the pool atomically.
pub struct TransactionPool {
    inner: HashMap<String, Transaction>,
}

impl Default for TransactionPool {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionPool {
    pub fn new() -> TransactionPool {
        TransactionPool {
            inner: HashMap::new(),
        }
    }

    /// Insert unless the id is already pooled. Returns true only when the
    /// transaction was newly inserted; resubmissions keep the first entry.
    pub fn add(&mut self, tx: Transaction) -> bool {
        match self.inner.entry(tx.get_id().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(tx);
                true
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Point-in-time view of the pool for mining, ordered by id so the
    /// same pool contents always snapshot identically.
    pub fn snapshot(&self) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self.inner.values().cloned().collect();
        transactions.sort_by(|a, b| a.get_id().cmp(b.get_id()));
        transactions
    }

    /// Drop every pooled transaction whose id appears in a newly accepted
    /// block, regardless of its other fields.
    pub fn remove_confirmed(&mut self, ids: &[&str]) {
        for id in ids {
            self.inner.remove(*id);
        }
    }
}
