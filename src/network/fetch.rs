use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::error::PeerError;

/// Body of a peer's `/chain` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Retrieves the chain a peer currently reports.
pub trait ChainFetcher: Send + Sync {
    fn fetch_chain(&self, peer: &str) -> Result<ChainReport, PeerError>;
}

/// Synchronous HTTP fetcher hitting `{scheme}://{peer}/chain`.
/// Must not be called from an async worker thread; the API runs it through
/// `web::block`.
pub struct HttpChainFetcher {
    client: Client,
    scheme: String,
}

impl HttpChainFetcher {
    pub fn new(scheme: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            scheme: scheme.into(),
        })
    }

    fn chain_url(&self, peer: &str) -> String {
        format!("{}://{}/chain", self.scheme, peer)
    }
}

impl ChainFetcher for HttpChainFetcher {
    fn fetch_chain(&self, peer: &str) -> Result<ChainReport, PeerError> {
        let unreachable = |e: reqwest::Error| PeerError::Unreachable {
            peer: peer.to_string(),
            reason: e.to_string(),
        };

        let url = self.chain_url(peer);
        debug!("FETCH - GET {url}");
        let response = self.client.get(&url).send().map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::BadStatus {
                peer: peer.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<ChainReport>().map_err(unreachable)
    }
}
