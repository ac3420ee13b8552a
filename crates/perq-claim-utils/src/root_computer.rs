use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use color_eyre::eyre::{
    Result,
    WrapErr as _,
};
use perq_claim::TargetSet;
use tracing::debug;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to the target address list, one hex address per line
    #[arg(long, value_name = "PATH")]
    addresses_file: PathBuf,
}

/// Computes and prints the merkle root committed on-chain for a campaign
/// target list.
///
/// # Errors
///
/// Returns an error if the address list cannot be read, is empty, or
/// contains a malformed address.
pub fn run(
    Args {
        addresses_file,
    }: &Args,
) -> Result<()> {
    let target_set = read_target_set(addresses_file)?;
    println!("{}", target_set.root_hex());
    Ok(())
}

/// Reads an address list file (blank lines ignored) and builds its target
/// set.
pub(crate) fn read_target_set(path: &Path) -> Result<TargetSet> {
    let contents = fs::read_to_string(path).wrap_err("failed to read target address list")?;
    let addresses = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());
    let target_set = TargetSet::from_addresses(addresses)
        .wrap_err("failed to build the campaign target set")?;
    debug!(
        addresses = target_set.address_count(),
        root = %target_set.root_hex(),
        "built campaign target set",
    );
    Ok(target_set)
}
