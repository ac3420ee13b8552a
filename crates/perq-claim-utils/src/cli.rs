use clap::{
    Parser,
    Subcommand,
};

use super::{
    proof_generator,
    proof_verifier,
    root_computer,
};

/// Utilities for working with campaign reward-claim merkle proofs
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the merkle root to commit on-chain for a target address list
    #[command(arg_required_else_help = true)]
    ComputeRoot(root_computer::Args),

    /// Generate the claim payload for one address of a target list
    #[command(arg_required_else_help = true)]
    GenerateProof(proof_generator::Args),

    /// Check a claim payload against a committed root
    #[command(arg_required_else_help = true)]
    VerifyProof(proof_verifier::Args),
}

#[must_use]
pub fn get() -> Command {
    Cli::parse().command
}
