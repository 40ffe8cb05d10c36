use log::debug;

use super::{Block, hash, valid_proof};

/// Validate a whole chain: every block links to the hash of its predecessor
/// and carries a proof valid against it. Single forward pass, stops at the
/// first bad pair. An empty chain has no genesis and is rejected.
pub fn valid_chain(chain: &[Block]) -> bool {
    if chain.is_empty() {
        return false;
    }

    for pair in chain.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        debug!("VALIDATE - #{} -> #{}", prev.index, current.index);

        let prev_hash = hash(prev);
        // Check linkage
        if current.previous_hash != prev_hash {
            debug!("VALIDATE - #{} does not link to its predecessor", current.index);
            return false;
        }

        if !valid_proof(prev.proof, current.proof, &prev_hash) {
            debug!("VALIDATE - #{} carries an invalid proof", current.index);
            return false;
        }
    }

    true
}
