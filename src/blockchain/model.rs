use log::{debug, warn};

use super::{Block, Clock, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, SystemClock, hash};
use crate::transaction::Transaction;

/// In-memory ledger: the block chain plus the pool of transactions
/// waiting for the next block.
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    clock: Box<dyn Clock>,
}

impl Ledger {
    /// Initialize a new ledger with a genesis block, stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            clock,
        };
        ledger.new_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        ledger
    }

    /// Queue a transaction for the next block. Returns the index of that block.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> u64 {
        self.pending
            .push(Transaction::new(sender, recipient, amount));
        self.last_block().index + 1
    }

    /// Forge a block holding every pending transaction and append it.
    /// Without an explicit `previous_hash` the block links to the current head.
    pub fn new_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = match previous_hash {
            Some(h) => h,
            None => hash(self.last_block()),
        };
        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: self.clock.now(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };
        debug!(
            "LEDGER - appended block #{} with {} txs",
            block.index,
            block.transactions.len()
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Swap the whole chain at once. Callers validate `chain` first.
    /// An empty chain is refused and leaves the ledger untouched.
    pub fn replace_chain(&mut self, chain: Vec<Block>) -> bool {
        if chain.is_empty() {
            warn!("LEDGER - refusing to replace chain with an empty one");
            return false;
        }
        self.chain = chain;
        true
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Ledger;
    use crate::blockchain::clock::FixedClock;
    use crate::blockchain::{hash, mine};
    use crate::transaction::Transaction;

    fn ledger() -> Ledger {
        Ledger::with_clock(Box::new(FixedClock(1_700_000_000)))
    }

    #[test]
    fn genesis_invariant() {
        let l = ledger();
        assert_eq!(l.len(), 1);
        let genesis = &l.chain()[0];
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.previous_hash, "0");
        assert_eq!(genesis.proof, 100);
        assert!(genesis.transactions.is_empty());
        assert!(l.pending().is_empty());
    }

    #[test]
    fn new_transaction_targets_next_block() {
        let mut l = ledger();
        assert_eq!(l.new_transaction("a", "b", 1), 2);
        assert_eq!(l.new_transaction("b", "c", 2), 2);
        assert_eq!(l.pending().len(), 2);
    }

    #[test]
    fn new_block_drains_pool_in_order() {
        let mut l = ledger();
        l.new_transaction("a", "b", 1);
        l.new_transaction("c", "d", 2);

        let block = l.new_block(42, None).clone();
        assert_eq!(
            block.transactions,
            vec![Transaction::new("a", "b", 1), Transaction::new("c", "d", 2)]
        );
        assert!(l.pending().is_empty());
        assert_eq!(block.index, 2);
        assert_eq!(block.timestamp, 1_700_000_000);
    }

    #[test]
    fn new_block_links_to_head_by_default() {
        let mut l = ledger();
        let head_hash = hash(l.last_block());
        let block = l.new_block(7, None);
        assert_eq!(block.previous_hash, head_hash);
    }

    #[test]
    fn new_block_honours_explicit_previous_hash() {
        let mut l = ledger();
        let block = l.new_block(7, Some("feed".into()));
        assert_eq!(block.previous_hash, "feed");
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn replace_chain_swaps_everything() {
        let mut other = ledger();
        let proof = mine(other.last_block());
        other.new_block(proof, None);

        let mut l = ledger();
        assert!(l.replace_chain(other.chain().to_vec()));
        assert_eq!(l.chain(), other.chain());
        assert_eq!(l.new_transaction("a", "b", 1), 3);
    }

    #[test]
    fn replace_chain_refuses_empty_chain() {
        let mut l = ledger();
        let before = l.chain().to_vec();
        assert!(!l.replace_chain(Vec::new()));
        assert_eq!(l.chain(), before.as_slice());
        assert_eq!(l.last_block().proof, 100);
    }
}
