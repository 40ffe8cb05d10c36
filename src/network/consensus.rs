use std::thread;

use log::{debug, info, warn};

use super::{ChainFetcher, ChainReport, PeerRegistry};
use crate::blockchain::{Block, Ledger, valid_chain};
use crate::error::PeerError;

/// Upper bound on peer fetches in flight at once.
pub const MAX_PARALLEL_FETCHES: usize = 8;

/// Ask every peer for its chain. Fetches run in parallel, at most
/// `MAX_PARALLEL_FETCHES` at a time; results come back in registry order.
pub fn fetch_candidates(
    peers: &[String],
    fetcher: &dyn ChainFetcher,
) -> Vec<(String, Result<ChainReport, PeerError>)> {
    let mut results = Vec::with_capacity(peers.len());
    for batch in peers.chunks(MAX_PARALLEL_FETCHES) {
        thread::scope(|s| {
            let handles: Vec<_> = batch
                .iter()
                .map(|peer| (peer, s.spawn(move || fetcher.fetch_chain(peer))))
                .collect();

            for (peer, handle) in handles {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(PeerError::Unreachable {
                        peer: peer.clone(),
                        reason: "fetch thread panicked".into(),
                    })
                });
                results.push((peer.clone(), result));
            }
        });
    }
    results
}

/// Fork choice: the longest valid candidate strictly longer than
/// `current_len`. Unreachable peers and invalid chains are skipped.
/// Among equally long winners the first in iteration order is kept.
pub fn choose_chain(
    current_len: usize,
    candidates: Vec<(String, Result<ChainReport, PeerError>)>,
) -> Option<Vec<Block>> {
    let mut max_length = current_len;
    let mut best = None;

    for (peer, result) in candidates {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                warn!("CONSENSUS - skipping {peer}: {e}");
                continue;
            }
        };

        if report.length <= max_length {
            debug!(
                "CONSENSUS - {peer} reports length {} (need > {max_length})",
                report.length
            );
            continue;
        }
        if report.length != report.chain.len() {
            debug!(
                "CONSENSUS - {peer} reports length {} but sent {} blocks",
                report.length,
                report.chain.len()
            );
            continue;
        }
        if !valid_chain(&report.chain) {
            debug!("CONSENSUS - {peer} sent an invalid chain, discarded");
            continue;
        }

        max_length = report.length;
        best = Some(report.chain);
    }

    best
}

/// Replace the ledger's chain with the best candidate, if any beats it.
pub fn apply_best(
    ledger: &mut Ledger,
    candidates: Vec<(String, Result<ChainReport, PeerError>)>,
) -> bool {
    match choose_chain(ledger.len(), candidates) {
        Some(chain) => {
            info!(
                "CONSENSUS - replacing chain ({} -> {} blocks)",
                ledger.len(),
                chain.len()
            );
            ledger.replace_chain(chain)
        }
        None => {
            info!("CONSENSUS - local chain is authoritative ({} blocks)", ledger.len());
            false
        }
    }
}

/// Fetch every registered peer's chain and adopt the longest valid one.
/// Returns whether the local chain was replaced.
pub fn resolve_conflicts(
    ledger: &mut Ledger,
    peers: &PeerRegistry,
    fetcher: &dyn ChainFetcher,
) -> bool {
    let peers: Vec<String> = peers.iter().map(str::to_string).collect();
    let candidates = fetch_candidates(&peers, fetcher);
    apply_best(ledger, candidates)
}
