use thiserror::Error;

/// Failures tied to a single peer: a bad address at registration, or a
/// fetch that did not produce a chain.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("invalid peer address: {0:?}")]
    InvalidAddress(String),
    #[error("peer {peer} unreachable: {reason}")]
    Unreachable { peer: String, reason: String },
    #[error("peer {peer} answered with status {status}")]
    BadStatus { peer: String, status: u16 },
}

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("chain head moved while mining; proof discarded")]
    MiningSuperseded,
    #[error(transparent)]
    Peer(#[from] PeerError),
}
