use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// A single block in the ledger. This is also the wire format exchanged
/// between peers, so the field set is exactly what gets hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Canonical byte encoding: JSON with object keys sorted, so two blocks
    /// with the same content always encode identically.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        // serde_json::Value objects are BTreeMap-backed, which sorts the keys.
        let value = serde_json::to_value(self).expect("serialize block");
        serde_json::to_vec(&value).expect("encode block")
    }
}

/// SHA-256 of the block's canonical encoding, lowercase hex.
pub fn hash(block: &Block) -> String {
    let mut hasher = Sha256::new();
    hasher.update(block.canonical_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::{Block, hash};
    use crate::transaction::Transaction;

    fn sample() -> Block {
        Block {
            index: 2,
            timestamp: 1_700_000_000,
            transactions: vec![Transaction::new("alice", "bob", 5)],
            proof: 35_293,
            previous_hash: "abc".into(),
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let b = sample();
        assert_eq!(hash(&b), hash(&b));
        assert_eq!(hash(&b), hash(&b.clone()));
    }

    #[test]
    fn hash_is_lowercase_sha256_hex() {
        let h = hash(&sample());
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn canonical_bytes_have_sorted_keys() {
        let text = String::from_utf8(sample().canonical_bytes()).unwrap();
        assert_eq!(
            text,
            r#"{"index":2,"previous_hash":"abc","proof":35293,"timestamp":1700000000,"transactions":[{"amount":5,"recipient":"bob","sender":"alice"}]}"#
        );
    }

    #[test]
    fn hash_ignores_wire_key_order() {
        let shuffled = r#"{"transactions":[{"sender":"alice","amount":5,"recipient":"bob"}],
            "proof":35293,"previous_hash":"abc","timestamp":1700000000,"index":2}"#;
        let decoded: Block = serde_json::from_str(shuffled).unwrap();
        assert_eq!(hash(&decoded), hash(&sample()));
    }

    #[test]
    fn hash_changes_when_mutated() {
        let b = sample();
        let old = hash(&b);

        let mut tampered = b.clone();
        tampered.transactions.push(Transaction::new("x", "y", 1));
        assert_ne!(old, hash(&tampered));

        let mut tampered = b;
        tampered.proof += 1;
        assert_ne!(old, hash(&tampered));
    }
}
