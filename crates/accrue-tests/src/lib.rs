//! Integration test crate for accrue.
//!
//! The tests under `tests/` drive the ledger through its public API only,
//! with the in-memory custody and reward token standing in for the
//! execution environment. Shared fixtures live in [`helpers`].

pub mod helpers;
