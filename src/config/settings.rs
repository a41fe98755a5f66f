use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_NODE_ID: &str = "node_1";
static DEFAULT_NODE_ADDR: &str = "127.0.0.1:50051";
static DEFAULT_EVENT_LOG: &str = "logs/simulation_data.csv";

const NODE_ID_KEY: &str = "NODE_ID";
const NODE_ADDRESS_KEY: &str = "NODE_ADDRESS";
const PEERS_KEY: &str = "PEERS";
const EVENT_LOG_KEY: &str = "EVENT_LOG";

/// Environment-driven node configuration, read once at startup:
/// `NODE_ID` (label), `NODE_ADDRESS` (listen address), `PEERS`
/// (comma-separated `host:port` list), `EVENT_LOG` (CSV sink path).
pub struct Config {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Config {
        let mut map = HashMap::new();
        map.insert(
            String::from(NODE_ID_KEY),
            env::var(NODE_ID_KEY).unwrap_or_else(|_| String::from(DEFAULT_NODE_ID)),
        );
        map.insert(
            String::from(NODE_ADDRESS_KEY),
            env::var(NODE_ADDRESS_KEY).unwrap_or_else(|_| String::from(DEFAULT_NODE_ADDR)),
        );
        map.insert(
            String::from(PEERS_KEY),
            env::var(PEERS_KEY).unwrap_or_default(),
        );
        map.insert(
            String::from(EVENT_LOG_KEY),
            env::var(EVENT_LOG_KEY).unwrap_or_else(|_| String::from(DEFAULT_EVENT_LOG)),
        );

        Config {
            inner: RwLock::new(map),
        }
    }

    fn get(&self, key: &str) -> String {
        let inner = self
            .inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen");
        inner
            .get(key)
            .expect("Config keys are populated at construction")
            .clone()
    }

    pub fn get_node_id(&self) -> String {
        self.get(NODE_ID_KEY)
    }

    pub fn get_node_addr(&self) -> String {
        self.get(NODE_ADDRESS_KEY)
    }

    pub fn get_peers(&self) -> Vec<String> {
        parse_peers(&self.get(PEERS_KEY))
    }

    pub fn get_event_log_path(&self) -> String {
        self.get(EVENT_LOG_KEY)
    }

    /// Extract the port from the listen address (e.g. "127.0.0.1:50051"
    /// -> "50051") for the startup log detail.
    pub fn extract_port(&self) -> String {
        let addr = self.get_node_addr();
        if let Some(port) = addr.split(':').next_back() {
            port.to_string()
        } else {
            "default".to_string()
        }
    }
}

/// Split a comma-separated peer list, dropping empty entries so a missing
/// or trailing-comma `PEERS` value yields a clean list.
pub(crate) fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|peer| peer.trim())
        .filter(|peer| !peer.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_peers_splits_on_commas() {
        assert_eq!(
            parse_peers("node_2:50051,node_3:50051"),
            vec!["node_2:50051".to_string(), "node_3:50051".to_string()]
        );
    }

    #[test]
    fn test_parse_peers_drops_empty_entries() {
        assert!(parse_peers("").is_empty());
        assert_eq!(
            parse_peers("node_2:50051,,"),
            vec!["node_2:50051".to_string()]
        );
        assert_eq!(parse_peers(" node_2:50051 "), vec!["node_2:50051".to_string()]);
    }
}
