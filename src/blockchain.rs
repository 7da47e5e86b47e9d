// Thin re-export module: implementation is in `blockchain/core.rs`, split into
// block construction, the ledger itself, and whole-chain validation.

pub mod core;
pub use core::*;
