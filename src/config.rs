use std::env;
use std::time::Duration;

use uuid::Uuid;

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub node_id: String,
    pub peer_scheme: String,
    pub peer_timeout: Duration,
    pub peers: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Missing or unparseable values fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = lookup("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        // Globally unique address for this node.
        let node_id = lookup("NODE_ID")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let peer_scheme = lookup("PEER_SCHEME").unwrap_or_else(|| "http".to_string());
        let timeout_secs: u64 = lookup("PEER_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        let peers = lookup("PEERS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            node_id,
            peer_scheme,
            peer_timeout: Duration::from_secs(timeout_secs),
            peers,
        }
    }
}
