use std::{
    fs,
    path::PathBuf,
};

use color_eyre::eyre::{
    bail,
    eyre,
    Result,
    WrapErr as _,
};
use perq_claim::ClaimProof;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to the claim payload JSON
    #[arg(long, value_name = "PATH")]
    payload_file: PathBuf,

    /// Expected committed root as hex; defaults to the root in the payload
    #[arg(long)]
    root: Option<String>,
}

/// Checks a claim payload against the committed root, recomputing the root
/// from the payload's leaf hash and sibling path.
///
/// # Errors
///
/// Returns an error if the payload cannot be read or parsed, or if the
/// proof does not recompute the committed root.
pub fn run(
    Args {
        payload_file,
        root,
    }: Args,
) -> Result<()> {
    let payload = fs::read_to_string(&payload_file).wrap_err("failed to read claim payload")?;
    let claim: ClaimProof =
        serde_json::from_str(&payload).wrap_err("failed to parse claim payload")?;
    let expected_root = match root {
        Some(root) => decode_root(&root)?,
        None => claim.root(),
    };
    if !claim.verify(expected_root) {
        bail!(
            "claim proof for leaf index {} does not recompute the committed root {}",
            claim.index(),
            hex::encode(expected_root),
        );
    }
    println!(
        "OK: leaf index {} recomputes root {}",
        claim.index(),
        hex::encode(expected_root),
    );
    Ok(())
}

fn decode_root(root: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(root.strip_prefix("0x").unwrap_or(root))
        .wrap_err("expected the committed root as hex")?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| eyre!("expected a 32-byte root, got {} bytes", bytes.len()))
}
