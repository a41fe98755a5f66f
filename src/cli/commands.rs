use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gossip-chain")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "startnode",
        about = "Start a ledger node: serve RPC requests and mine continuously"
    )]
    StartNode,
    #[command(
        name = "send",
        about = "Generate random transactions and submit them to a node"
    )]
    Send {
        #[arg(help = "Target node address (host:port)")]
        target: String,
        #[arg(help = "Number of transactions to submit", default_value_t = 10)]
        count: u32,
    },
}
