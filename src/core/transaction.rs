use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A pending value transfer. The id is caller-supplied and treated as an
/// opaque unique token; amount and timestamp are carried unvalidated.
/// Equality is full-field equality, which is what pool dedupe keys on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: String,
    sender: String,
    receiver: String,
    amount: f64,
    timestamp: f64,
}

impl Transaction {
    pub fn new(
        id: String,
        sender: String,
        receiver: String,
        amount: f64,
        timestamp: f64,
    ) -> Transaction {
        Transaction {
            id,
            sender,
            receiver,
            amount,
            timestamp,
        }
    }

    pub fn get_id(&self) -> &str {
        self.id.as_str()
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_receiver(&self) -> &str {
        self.receiver.as_str()
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn get_timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Stable textual form used by block hashing. Field order is the
    /// declaration order, so identical field values always render the same.
    pub fn canonical_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            "tx-1".to_string(),
            "C".to_string(),
            "R1".to_string(),
            10.0,
            1000.0,
        )
    }

    #[test]
    fn test_equality_is_full_field() {
        assert_eq!(sample(), sample());

        let mut other = sample();
        other.amount = 11.0;
        assert_ne!(sample(), other);

        // Same id alone is not equality
        let mut same_id = sample();
        same_id.sender = "D".to_string();
        assert_ne!(sample(), same_id);
    }

    #[test]
    fn test_canonical_string_is_stable() {
        let a = sample().canonical_string().unwrap();
        let b = sample().canonical_string().unwrap();
        assert_eq!(a, b);
        assert!(a.contains("\"tx-1\""));
    }
}
