use clap::Parser;
use gossip_chain::eventlog::NODE_STARTED;
use gossip_chain::{
    call, current_timestamp, Command, EventLog, Miner, NodeState, Opt, PeerBroadcaster, Request,
    Server, Transaction, GLOBAL_CONFIG,
};
use log::{error, LevelFilter};
use rand::Rng;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use uuid::Uuid;

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // Run a node: genesis chain, background miner, blocking RPC server.
        Command::StartNode => {
            let node_id = GLOBAL_CONFIG.get_node_id();
            let addr = GLOBAL_CONFIG.get_node_addr();
            let peers = GLOBAL_CONFIG.get_peers();

            let events = Arc::new(EventLog::new(
                GLOBAL_CONFIG.get_event_log_path(),
                node_id.clone(),
            ));
            events.record(
                NODE_STARTED,
                &format!(
                    "Node {node_id} started on port {}",
                    GLOBAL_CONFIG.extract_port()
                ),
            );

            let state = NodeState::new()?;
            let broadcaster = Arc::new(PeerBroadcaster::new(peers));

            let miner = Miner::new(
                state.clone(),
                Arc::clone(&broadcaster),
                Arc::clone(&events),
                node_id,
            );
            thread::spawn(move || miner.run());

            let server = Server::new(state, broadcaster, events);
            server.run(&addr).map_err(|e| format!("Server error: {e}"))?;
        }
        // Act as a client: generate transactions and submit them one by one.
        Command::Send { target, count } => {
            println!("Client connecting to {target}, sending {count} transactions...");

            let mut rng = rand::thread_rng();
            for i in 0..count {
                let transaction = Transaction::new(
                    Uuid::new_v4().to_string(),
                    "Client".to_string(),
                    format!("Recipient_{}", rng.gen_range(1..=100)),
                    rng.gen_range(1.0..100.0),
                    current_timestamp()?,
                );

                match call(&target, &Request::SubmitTransaction { transaction }) {
                    Ok(ack) => println!("Sent Tx {}/{}: {}", i + 1, count, ack.message),
                    Err(e) => println!("RPC failed: {e}"),
                }

                // Throttle slightly
                thread::sleep(Duration::from_millis(100));
            }
        }
    }
    Ok(())
}
