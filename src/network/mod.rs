pub mod consensus;
pub mod fetch;
pub mod peers;

pub use consensus::{apply_best, fetch_candidates, resolve_conflicts};
pub use fetch::{ChainFetcher, ChainReport, HttpChainFetcher};
pub use peers::PeerRegistry;
