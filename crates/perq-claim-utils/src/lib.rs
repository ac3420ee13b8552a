//! Utilities for working with campaign reward-claim proofs without going
//! through the backend: compute the root to commit for a target list,
//! generate a claim payload for one address, and check a payload against a
//! committed root. All three commands share the library's single hashing
//! policy, so the on-chain convention is never re-derived here.

pub mod cli;
pub mod proof_generator;
pub mod proof_verifier;
pub mod root_computer;
