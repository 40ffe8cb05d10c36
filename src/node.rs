use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use log::{info, warn};

use crate::blockchain::{Block, Ledger, MINING_REWARD, REWARD_SENDER, hash, mine_interruptible};
use crate::error::NodeError;
use crate::network::{ChainFetcher, PeerRegistry, apply_best, fetch_candidates};
use crate::transaction::Transaction;

/// One ledger node: the chain, its peers and the identity it mines for.
/// Every mutation goes through one of the mutexes, so chain replacement is
/// never observed half-done.
pub struct Node {
    node_id: String,
    ledger: Mutex<Ledger>,
    peers: Mutex<PeerRegistry>,
    fetcher: Box<dyn ChainFetcher>,
    /// Bumped whenever the head changes; a running proof search aborts on it.
    epoch: AtomicU64,
}

impl Node {
    pub fn new(node_id: impl Into<String>, ledger: Ledger, fetcher: Box<dyn ChainFetcher>) -> Self {
        Self {
            node_id: node_id.into(),
            ledger: Mutex::new(ledger),
            peers: Mutex::new(PeerRegistry::new()),
            fetcher,
            epoch: AtomicU64::new(0),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn new_transaction(&self, sender: &str, recipient: &str, amount: u64) -> u64 {
        let mut ledger = self.ledger.lock().expect("mutex poisoned");
        ledger.new_transaction(sender, recipient, amount)
    }

    /// Search a proof for the current head (without holding the ledger lock),
    /// then credit the reward and forge the block. Fails if another block
    /// landed or the chain was replaced in the meantime.
    pub fn mine(&self) -> Result<Block, NodeError> {
        let t0 = Instant::now();
        let (last_block, epoch) = self.head();

        let proof = mine_interruptible(&last_block, || {
            self.epoch.load(Ordering::Acquire) != epoch
        })
        .ok_or(NodeError::MiningSuperseded)?;

        let block = self.forge(&last_block, epoch, proof)?;
        info!(
            "MINER - sealed block #{} (proof={}, {} ms)",
            block.index,
            block.proof,
            t0.elapsed().as_millis()
        );
        Ok(block)
    }

    /// Current head together with the epoch it was read at.
    fn head(&self) -> (Block, u64) {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        (ledger.last_block().clone(), self.epoch.load(Ordering::Acquire))
    }

    /// Append the block for `proof` on top of `last_block`, unless the head
    /// moved since `epoch` was read.
    fn forge(&self, last_block: &Block, epoch: u64, proof: u64) -> Result<Block, NodeError> {
        let mut ledger = self.ledger.lock().expect("mutex poisoned");
        let previous_hash = hash(last_block);
        if self.epoch.load(Ordering::Acquire) != epoch
            || hash(ledger.last_block()) != previous_hash
        {
            warn!("MINER - head moved while searching; dropping proof {proof}");
            return Err(NodeError::MiningSuperseded);
        }

        // "0" as sender marks the block reward.
        ledger.new_transaction(REWARD_SENDER, self.node_id.as_str(), MINING_REWARD);
        let block = ledger.new_block(proof, Some(previous_hash)).clone();
        self.epoch.fetch_add(1, Ordering::AcqRel);
        Ok(block)
    }

    pub fn register_peer(&self, address: &str) -> Result<String, NodeError> {
        let mut peers = self.peers.lock().expect("mutex poisoned");
        Ok(peers.register(address)?)
    }

    pub fn peers(&self) -> Vec<String> {
        let peers = self.peers.lock().expect("mutex poisoned");
        peers.iter().map(str::to_string).collect()
    }

    /// Consensus round. Peers are queried without holding the ledger lock;
    /// the winner is then chosen against the chain length at apply time.
    pub fn resolve_conflicts(&self) -> bool {
        let peers = self.peers();
        let candidates = fetch_candidates(&peers, self.fetcher.as_ref());

        let mut ledger = self.ledger.lock().expect("mutex poisoned");
        let replaced = apply_best(&mut ledger, candidates);
        if replaced {
            self.epoch.fetch_add(1, Ordering::AcqRel);
        }
        replaced
    }

    pub fn chain(&self) -> Vec<Block> {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        ledger.chain().to_vec()
    }

    pub fn last_block(&self) -> Block {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        ledger.last_block().clone()
    }

    pub fn pending(&self) -> Vec<Transaction> {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        ledger.pending().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::Node;
    use crate::blockchain::{MINING_REWARD, REWARD_SENDER, hash, mine, valid_chain};
    use crate::error::{NodeError, PeerError};
    use crate::network::consensus::tests::{StubFetcher, ledger, mine_onto};
    use crate::transaction::Transaction;

    fn node(fetcher: StubFetcher) -> Node {
        Node::new("node-a", ledger(), Box::new(fetcher))
    }

    #[test]
    fn mine_appends_reward_after_pending() {
        let n = node(StubFetcher::default());
        assert_eq!(n.new_transaction("alice", "bob", 3), 2);

        let genesis_hash = hash(&n.last_block());
        let block = n.mine().unwrap();

        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, genesis_hash);
        assert_eq!(
            block.transactions,
            vec![
                Transaction::new("alice", "bob", 3),
                Transaction::new(REWARD_SENDER, "node-a", MINING_REWARD),
            ]
        );
        assert!(n.pending().is_empty());
        assert!(valid_chain(&n.chain()));
    }

    #[test]
    fn repeated_mining_keeps_chain_valid() {
        let n = node(StubFetcher::default());
        for _ in 0..3 {
            n.mine().unwrap();
        }
        let chain = n.chain();
        assert_eq!(chain.len(), 4);
        assert!(valid_chain(&chain));
    }

    #[test]
    fn register_reports_invalid_address() {
        let n = node(StubFetcher::default());
        assert_eq!(n.register_peer("http://a.com:5000").unwrap(), "a.com:5000");
        assert!(matches!(
            n.register_peer(""),
            Err(NodeError::Peer(PeerError::InvalidAddress(_)))
        ));
        assert_eq!(n.peers(), vec!["a.com:5000"]);
    }

    #[test]
    fn resolve_adopts_longer_peer_chain() {
        let mut remote = ledger();
        mine_onto(&mut remote, 2);
        let remote_chain = remote.chain().to_vec();

        let n = node(StubFetcher::default().with("peer:5000", remote_chain.clone()));
        n.register_peer("http://peer:5000").unwrap();

        assert!(n.resolve_conflicts());
        assert_eq!(n.chain(), remote_chain);
        assert!(!n.resolve_conflicts());
    }

    #[test]
    fn proof_found_after_chain_replacement_is_dropped() {
        let mut remote = ledger();
        mine_onto(&mut remote, 2);
        let remote_chain = remote.chain().to_vec();

        let n = node(StubFetcher::default().with("peer:5000", remote_chain.clone()));
        n.register_peer("peer:5000").unwrap();
        n.new_transaction("alice", "bob", 3);

        let (head, epoch) = n.head();
        let proof = mine(&head);
        assert!(n.resolve_conflicts());

        assert!(matches!(
            n.forge(&head, epoch, proof),
            Err(NodeError::MiningSuperseded)
        ));
        assert_eq!(n.chain(), remote_chain);
        assert_eq!(n.pending(), vec![Transaction::new("alice", "bob", 3)]);
    }

    #[test]
    fn proof_found_after_another_block_is_dropped() {
        let n = node(StubFetcher::default());
        let (head, epoch) = n.head();
        let proof = mine(&head);

        let first = n.forge(&head, epoch, proof).unwrap();
        assert_eq!(first.index, 2);

        // Same stale snapshot again: the epoch has moved on.
        assert!(matches!(
            n.forge(&head, epoch, proof),
            Err(NodeError::MiningSuperseded)
        ));
        // A fresh epoch with a stale head is caught by the hash check.
        let (_, current_epoch) = n.head();
        assert!(matches!(
            n.forge(&head, current_epoch, proof),
            Err(NodeError::MiningSuperseded)
        ));
        assert_eq!(n.chain().len(), 2);
        assert!(valid_chain(&n.chain()));
    }
}
