use crate::core::{Block, Transaction};
use crate::network::protocol::{call, BlockMessage, Request};
use std::thread;

/// Best-effort fan-out to the configured peer set. Every delivery runs on
/// its own short-lived thread, independent of the others; failures of any
/// kind are swallowed. Peers might be down. Callers never wait.
pub struct PeerBroadcaster {
    peers: Vec<String>,
}

impl PeerBroadcaster {
    pub fn new(peers: Vec<String>) -> PeerBroadcaster {
        PeerBroadcaster { peers }
    }

    pub fn peers(&self) -> &[String] {
        self.peers.as_slice()
    }

    pub fn broadcast_transaction(&self, transaction: &Transaction) {
        for peer in &self.peers {
            let peer = peer.clone();
            let request = Request::BroadcastTransaction {
                transaction: transaction.clone(),
            };
            thread::spawn(move || {
                let _ = call(&peer, &request);
            });
        }
    }

    pub fn broadcast_block(&self, block: &Block, miner_id: &str) {
        let message = BlockMessage::from_block(block, miner_id);
        for peer in &self.peers {
            let peer = peer.clone();
            let request = Request::BroadcastBlock {
                block: message.clone(),
            };
            thread::spawn(move || {
                let _ = call(&peer, &request);
            });
        }
    }
}
