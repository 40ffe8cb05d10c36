pub mod block;
pub mod clock;
pub mod model;
pub mod pow;
pub mod validate;

pub use block::{Block, hash};
pub use clock::{Clock, SystemClock};
pub use model::Ledger;
pub use pow::{mine, mine_interruptible, valid_proof};
pub use validate::valid_chain;

/// Proof-of-Work difficulty: number of leading hex zeros. Fixed, never retargeted.
pub const DIFFICULTY: usize = 4;

/// Proof stored in the genesis block (never mined).
pub const GENESIS_PROOF: u64 = 100;

/// `previous_hash` sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Sender of the reward transaction added by a mining node.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the mining node per block.
pub const MINING_REWARD: u64 = 1;
