use crate::core::{BlockVerdict, NodeState, Transaction, TxVerdict};
use crate::error::{NodeError, Result};
use crate::eventlog::{EventLog, BLOCK_RECEIVED, TRANSACTION_RECEIVED};
use crate::network::protocol::{Ack, BlockMessage, Request};
use crate::network::PeerBroadcaster;
use log::{error, info, warn};
use serde_json::Deserializer;
use std::io::{BufReader, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Cap on concurrently running request handlers; connections beyond it
/// are dropped at accept time.
const MAX_RPC_WORKERS: usize = 10;

const READ_TIMEOUT_SECS: u64 = 60;

/// The node's boundary service: accepts RPC connections and applies the
/// consensus gate to submitted transactions and gossiped blocks, answering
/// every request with an `Ack`.
pub struct Server {
    state: NodeState,
    broadcaster: Arc<PeerBroadcaster>,
    events: Arc<EventLog>,
    active_handlers: Arc<AtomicUsize>,
}

impl Server {
    pub fn new(state: NodeState, broadcaster: Arc<PeerBroadcaster>, events: Arc<EventLog>) -> Self {
        Self {
            state,
            broadcaster,
            events,
            active_handlers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Bind and serve forever.
    pub fn run(&self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .map_err(|e| NodeError::Network(format!("Failed to bind to {addr}: {e}")))?;
        self.serve(listener)
    }

    /// Serve on an already-bound listener. Split from `run` so tests can
    /// bind port 0 and learn the chosen address first.
    pub fn serve(&self, listener: TcpListener) -> Result<()> {
        info!(
            "Node listening on {}",
            listener
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "<unknown>".to_string())
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if self.active_handlers.load(Ordering::SeqCst) >= MAX_RPC_WORKERS {
                        warn!("Rejecting connection: handler limit reached");
                        continue;
                    }
                    self.active_handlers.fetch_add(1, Ordering::SeqCst);

                    let state = self.state.clone();
                    let broadcaster = Arc::clone(&self.broadcaster);
                    let events = Arc::clone(&self.events);
                    let active_handlers = Arc::clone(&self.active_handlers);

                    thread::spawn(move || {
                        if let Err(e) = handle_connection(state, broadcaster, events, stream) {
                            error!("Error handling connection: {e}");
                        }
                        active_handlers.fetch_sub(1, Ordering::SeqCst);
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {e}");
                }
            }
        }

        Ok(())
    }
}

/// Read requests off one connection, answering each with an `Ack`, until
/// the peer closes it.
fn handle_connection(
    state: NodeState,
    broadcaster: Arc<PeerBroadcaster>,
    events: Arc<EventLog>,
    stream: TcpStream,
) -> Result<()> {
    stream
        .set_read_timeout(Some(Duration::from_secs(READ_TIMEOUT_SECS)))
        .map_err(|e| NodeError::Network(format!("Failed to set read timeout: {e}")))?;

    let reader = BufReader::new(&stream);
    let requests = Deserializer::from_reader(reader).into_iter::<Request>();

    for request in requests {
        let request = request
            .map_err(|e| NodeError::Network(format!("Failed to deserialize request: {e}")))?;

        let ack = match request {
            Request::SubmitTransaction { transaction }
            | Request::BroadcastTransaction { transaction } => {
                handle_transaction(&state, &broadcaster, &events, transaction)
            }
            Request::BroadcastBlock { block } => handle_block(&state, &events, block),
        };

        serde_json::to_writer(&stream, &ack)
            .map_err(|e| NodeError::Network(format!("Failed to send acknowledgment: {e}")))?;
        let _ = (&stream).flush();
    }

    let _ = stream.shutdown(Shutdown::Both);
    Ok(())
}

/// Submitted and gossiped transactions take the same path: pool the
/// transaction, fan it out to peers when it is new, and ack success either
/// way (duplicates are idempotent).
fn handle_transaction(
    state: &NodeState,
    broadcaster: &PeerBroadcaster,
    events: &EventLog,
    transaction: Transaction,
) -> Ack {
    if state.accept_transaction(transaction.clone()) == TxVerdict::Added {
        events.record(
            TRANSACTION_RECEIVED,
            &format!(
                "Tx {} from {}",
                transaction.get_id(),
                transaction.get_sender()
            ),
        );
        broadcaster.broadcast_transaction(&transaction);
    }
    Ack::ok("Transaction added to pool")
}

/// Apply the consensus gate to an inbound peer block. Accepted peer blocks
/// are not re-gossiped; only the miner broadcasts, and only its own
/// blocks.
fn handle_block(state: &NodeState, events: &EventLog, message: BlockMessage) -> Ack {
    let index = message.index;
    let hash = message.hash.clone();
    let miner_id = message.miner_id.clone();

    match state.accept_block(message.into_block()) {
        BlockVerdict::AlreadyKnown => Ack::ok("Block already exists"),
        BlockVerdict::IndexTooLow => Ack::rejected("Block index too low"),
        BlockVerdict::InvalidProofOfWork => Ack::rejected("Invalid PoW"),
        BlockVerdict::Accepted => {
            info!("Received block {index} from {miner_id}");
            events.record(
                BLOCK_RECEIVED,
                &format!("Block {index} Hash {}", crate::utils::short_hash(&hash)),
            );
            Ack::ok("Block accepted")
        }
    }
}
