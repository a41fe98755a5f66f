use crate::core::proof_of_work::{self, BlockTemplate, SearchOutcome, DIFFICULTY};
use crate::core::NodeState;
use crate::eventlog::{EventLog, BLOCK_MINED};
use crate::network::PeerBroadcaster;
use crate::utils::{current_timestamp, short_hash};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Level-triggered restart flag shared between the consensus gate and the
/// miner's nonce search. Redundant sets while no search is in flight
/// accumulate nothing; the next snapshot simply clears the flag once.
#[derive(Clone, Default)]
pub struct MiningSignal {
    flag: Arc<AtomicBool>,
}

impl MiningSignal {
    pub fn new() -> MiningSignal {
        MiningSignal {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Background worker that repeatedly snapshots the tip and the pool, runs
/// the proof-of-work search outside the ledger lock, and hands every found
/// block back through the consensus gate before broadcasting it.
pub struct Miner {
    state: NodeState,
    broadcaster: Arc<PeerBroadcaster>,
    events: Arc<EventLog>,
    miner_id: String,
    stop: Arc<AtomicBool>,
}

impl Miner {
    pub fn new(
        state: NodeState,
        broadcaster: Arc<PeerBroadcaster>,
        events: Arc<EventLog>,
        miner_id: String,
    ) -> Miner {
        Miner {
            state,
            broadcaster,
            events,
            miner_id,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request termination of the mining loop. The restart signal doubles
    /// as the search's cancellation token so an in-flight search winds
    /// down promptly.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.state.mining_signal().set();
    }

    /// The mining loop. Runs until `shutdown`; every iteration mines
    /// against the freshest tip and pool, and a tip advanced by a peer
    /// block cancels the in-flight search and restarts immediately.
    pub fn run(&self) {
        info!("Mining started...");
        let restart = self.state.mining_signal();

        while !self.stop.load(Ordering::SeqCst) {
            let (tip_index, tip_hash, transactions) = self.state.mining_snapshot();

            let timestamp = match current_timestamp() {
                Ok(timestamp) => timestamp,
                Err(e) => {
                    error!("Failed to read wall clock: {e}");
                    continue;
                }
            };
            let template =
                match BlockTemplate::new(tip_index + 1, tip_hash, timestamp, transactions) {
                    Ok(template) => template,
                    Err(e) => {
                        error!("Failed to build block template: {e}");
                        continue;
                    }
                };

            match proof_of_work::search(&template, DIFFICULTY, &restart) {
                SearchOutcome::Cancelled => {
                    // New tip, new parent and transactions to mine against
                    continue;
                }
                SearchOutcome::Found { nonce, hash } => {
                    let block = template.into_block(nonce, hash);
                    let index = block.get_index();
                    let hash = block.get_hash().to_string();

                    // The gate re-checks the tip under the ledger lock, so
                    // a peer block that landed while we searched simply
                    // wins and we re-mine on top of it.
                    if self.state.accept_block(block.clone()).is_accepted() {
                        info!("Block {index} mined! Hash: {hash}");
                        self.events.record(
                            BLOCK_MINED,
                            &format!("Block {index} Hash {}", short_hash(&hash)),
                        );
                        self.broadcaster.broadcast_block(&block, &self.miner_id);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_mining_signal_is_level_triggered() {
        let signal = MiningSignal::new();
        assert!(!signal.is_set());
        signal.set();
        signal.set();
        assert!(signal.is_set());
        signal.clear();
        assert!(!signal.is_set());
    }

    #[test]
    fn test_signal_clones_share_the_flag() {
        let signal = MiningSignal::new();
        let other = signal.clone();
        other.set();
        assert!(signal.is_set());
    }

    #[test]
    fn test_miner_extends_the_chain_and_stops() {
        let dir = tempdir().unwrap();
        let state = NodeState::new().unwrap();
        let broadcaster = Arc::new(PeerBroadcaster::new(vec![]));
        let events = Arc::new(EventLog::new(
            dir.path().join("events.csv"),
            "node_test".to_string(),
        ));

        let miner = Arc::new(Miner::new(
            state.clone(),
            broadcaster,
            events,
            "node_test".to_string(),
        ));
        let worker = {
            let miner = Arc::clone(&miner);
            thread::spawn(move || miner.run())
        };

        // Difficulty 4 over short payloads lands in well under a second;
        // give the loop ample room before declaring failure.
        let mut waited = 0;
        while state.chain_len() < 2 && waited < 200 {
            thread::sleep(Duration::from_millis(50));
            waited += 1;
        }
        miner.shutdown();
        worker.join().unwrap();

        assert!(state.chain_len() >= 2, "miner never extended the chain");
        let tip_hash = state.tip_hash();
        assert!(proof_of_work::satisfies(&tip_hash, DIFFICULTY));
    }
}
