//! Peer-to-peer networking
//!
//! The JSON-over-TCP request/acknowledgment protocol, the node's RPC
//! server, and the fire-and-forget peer broadcaster.

pub mod broadcaster;
pub mod protocol;
pub mod server;

pub use broadcaster::PeerBroadcaster;
pub use protocol::{call, Ack, BlockMessage, Request};
pub use server::Server;
