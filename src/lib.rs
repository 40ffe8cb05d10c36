//! Proof-of-work ledger node: a hash-linked chain of blocks, a pending
//! transaction pool, and longest-valid-chain consensus between peers.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod network;
pub mod node;
pub mod transaction;
