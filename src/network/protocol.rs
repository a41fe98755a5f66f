use crate::core::{Block, Transaction, DIFFICULTY};
use crate::error::{NodeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Deserializer;
use std::io::{BufReader, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Socket timeouts of the call mechanism itself; the node layers no retry
/// or backoff on top.
const CALL_TIMEOUT_MS: u64 = 5000;

/// Inbound operations. Each connection carries JSON-encoded requests,
/// each answered synchronously with an `Ack`. `BroadcastTransaction` is
/// the node-to-node spelling of `SubmitTransaction` and takes the same
/// path.
#[derive(Debug, Serialize, Deserialize)]
pub enum Request {
    SubmitTransaction { transaction: Transaction },
    BroadcastTransaction { transaction: Transaction },
    BroadcastBlock { block: BlockMessage },
}

/// Synchronous acknowledgment returned for every inbound operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

impl Ack {
    pub fn ok(message: &str) -> Ack {
        Ack {
            success: true,
            message: message.to_string(),
        }
    }

    pub fn rejected(message: &str) -> Ack {
        Ack {
            success: false,
            message: message.to_string(),
        }
    }
}

/// Wire form of a gossiped block: the block fields plus the label of the
/// node that mined it and the difficulty it was mined at. The receiver
/// trusts the carried hash and never recomputes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockMessage {
    pub index: u64,
    pub previous_hash: String,
    pub timestamp: f64,
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub hash: String,
    pub miner_id: String,
    pub difficulty: usize,
}

impl BlockMessage {
    pub fn from_block(block: &Block, miner_id: &str) -> BlockMessage {
        BlockMessage {
            index: block.get_index(),
            previous_hash: block.get_previous_hash().to_string(),
            timestamp: block.get_timestamp(),
            transactions: block.get_transactions().to_vec(),
            nonce: block.get_nonce(),
            hash: block.get_hash().to_string(),
            miner_id: miner_id.to_string(),
            difficulty: DIFFICULTY,
        }
    }

    pub fn into_block(self) -> Block {
        Block::from_parts(
            self.index,
            self.previous_hash,
            self.timestamp,
            self.transactions,
            self.nonce,
            self.hash,
        )
    }
}

/// Point-to-point call: connect to `host:port`, send one request, read one
/// ack. Used by the peer broadcaster and the client command.
pub fn call(addr: &str, request: &Request) -> Result<Ack> {
    let mut stream = TcpStream::connect(addr)
        .map_err(|e| NodeError::Network(format!("Failed to connect to {addr}: {e}")))?;
    stream
        .set_read_timeout(Some(Duration::from_millis(CALL_TIMEOUT_MS)))
        .map_err(|e| NodeError::Network(format!("Failed to set read timeout: {e}")))?;
    stream
        .set_write_timeout(Some(Duration::from_millis(CALL_TIMEOUT_MS)))
        .map_err(|e| NodeError::Network(format!("Failed to set write timeout: {e}")))?;

    serde_json::to_writer(&stream, request)
        .map_err(|e| NodeError::Network(format!("Failed to send request: {e}")))?;
    let _ = stream.flush();

    let reader = BufReader::new(&stream);
    let mut acks = Deserializer::from_reader(reader).into_iter::<Ack>();
    match acks.next() {
        Some(Ok(ack)) => Ok(ack),
        Some(Err(e)) => Err(NodeError::Network(format!(
            "Failed to read acknowledgment from {addr}: {e}"
        ))),
        None => Err(NodeError::Network(format!(
            "Connection to {addr} closed before acknowledgment"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_round_trips() {
        let transaction = Transaction::new(
            "tx-1".to_string(),
            "C".to_string(),
            "R1".to_string(),
            10.0,
            1000.0,
        );
        let request = Request::SubmitTransaction { transaction };

        let serialized = serde_json::to_string(&request).unwrap();
        let deserialized: Request = serde_json::from_str(&serialized).unwrap();
        match deserialized {
            Request::SubmitTransaction { transaction } => {
                assert_eq!(transaction.get_id(), "tx-1");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_block_message_preserves_carried_hash() {
        let block = Block::from_parts(
            1,
            "0".to_string(),
            1000.0,
            vec![],
            42,
            "0000feed".to_string(),
        );
        let message = BlockMessage::from_block(&block, "node_1");
        assert_eq!(message.miner_id, "node_1");
        assert_eq!(message.difficulty, DIFFICULTY);

        let rebuilt = message.into_block();
        assert_eq!(rebuilt.get_hash(), "0000feed");
        assert_eq!(rebuilt.get_nonce(), 42);
        assert_eq!(rebuilt.get_index(), 1);
    }
}
