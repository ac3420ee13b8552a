use std::path::PathBuf;

use color_eyre::eyre::{
    Result,
    WrapErr as _,
};
use perq_claim::to_base_units;

use super::root_computer::read_target_set;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to the target address list, one hex address per line
    #[arg(long, value_name = "PATH")]
    addresses_file: PathBuf,

    /// The wallet address to prove membership for
    #[arg(long)]
    address: String,

    /// Reward amount in display units; scaled to base units in the payload
    #[arg(long)]
    amount: Option<f64>,
}

/// Generates the claim payload for one address of a campaign target list
/// and prints it as JSON on stdout.
///
/// # Errors
///
/// Returns an error if the address list cannot be read or built, or if the
/// address is malformed or not in the target set.
pub fn run(
    Args {
        addresses_file,
        address,
        amount,
    }: Args,
) -> Result<()> {
    let target_set = read_target_set(&addresses_file)?;
    let mut claim = target_set
        .claim_for(&address)
        .wrap_err("failed to generate a claim proof")?;
    if let Some(amount) = amount {
        claim = claim.with_amount(to_base_units(amount));
    }
    let json =
        serde_json::to_string_pretty(&claim).wrap_err("failed to serialize the claim payload")?;
    println!("{json}");
    Ok(())
}
