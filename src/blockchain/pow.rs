use sha2::{Digest, Sha256};

use super::{Block, DIFFICULTY, hash};

/// How many candidate proofs are tried between two `should_stop` polls.
const POLL_INTERVAL: u64 = 4096;

/// A proof is valid when SHA-256 of `"{last_proof}{proof}{last_hash}"`
/// starts with `DIFFICULTY` hex zeros.
pub fn valid_proof(last_proof: u64, proof: u64, last_hash: &str) -> bool {
    let guess = format!("{last_proof}{proof}{last_hash}");
    let digest = hex::encode(Sha256::digest(guess.as_bytes()));
    digest.bytes().take(DIFFICULTY).all(|c| c == b'0')
}

/// Smallest proof satisfying `valid_proof` against `last_block`.
/// Exhaustive ascending search from 0; blocks until found.
pub fn mine(last_block: &Block) -> u64 {
    let last_hash = hash(last_block);
    let mut proof = 0u64;
    while !valid_proof(last_block.proof, proof, &last_hash) {
        proof += 1;
    }
    proof
}

/// Same search as [`mine`], but gives up (returning `None`) once
/// `should_stop` reports true. It is polled every `POLL_INTERVAL` attempts.
pub fn mine_interruptible(last_block: &Block, should_stop: impl Fn() -> bool) -> Option<u64> {
    let last_hash = hash(last_block);
    let mut proof = 0u64;
    loop {
        if proof % POLL_INTERVAL == 0 && should_stop() {
            return None;
        }
        if valid_proof(last_block.proof, proof, &last_hash) {
            return Some(proof);
        }
        proof += 1;
    }
}
