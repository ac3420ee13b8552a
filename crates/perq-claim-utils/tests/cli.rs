use std::io::Write as _;

use assert_cmd::Command;
use predicates::prelude::*;

const FIVE_ADDRESS_ROOT: &str = "49e4393a139ea5c977d55127dc7dff99db74354958ca649978d932018fed965e";

/// Writes a target list of `n` addresses (`0x00..01` through `0x00..0n`),
/// one per line.
fn write_addresses(n: u8) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("must create a temp file");
    for i in 1..=n {
        writeln!(file, "{i:064x}").expect("must write to the temp file");
    }
    file
}

fn claim_utils() -> Command {
    Command::cargo_bin("perq-claim-utils").expect("binary must be built")
}

#[test]
fn compute_root_prints_the_committed_root() {
    let addresses = write_addresses(5);
    claim_utils()
        .arg("compute-root")
        .arg("--addresses-file")
        .arg(addresses.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(FIVE_ADDRESS_ROOT));
}

#[test]
fn compute_root_rejects_a_malformed_address() {
    let mut addresses = write_addresses(3);
    writeln!(addresses, "0xnot-hex").expect("must write to the temp file");
    claim_utils()
        .arg("compute-root")
        .arg("--addresses-file")
        .arg(addresses.path())
        .assert()
        .failure();
}

#[test]
fn generated_payload_verifies_against_the_committed_root() {
    let addresses = write_addresses(5);
    let output = claim_utils()
        .arg("generate-proof")
        .arg("--addresses-file")
        .arg(addresses.path())
        .arg("--address")
        .arg(format!("0x{:064x}", 3))
        .arg("--amount")
        .arg("1.5")
        .output()
        .expect("must run generate-proof");
    assert!(output.status.success());
    let payload = String::from_utf8(output.stdout).expect("payload must be utf8");
    assert!(payload.contains(FIVE_ADDRESS_ROOT));
    assert!(payload.contains("150000000"));

    let mut payload_file = tempfile::NamedTempFile::new().expect("must create a temp file");
    payload_file
        .write_all(payload.as_bytes())
        .expect("must write the payload");

    claim_utils()
        .arg("verify-proof")
        .arg("--payload-file")
        .arg(payload_file.path())
        .arg("--root")
        .arg(FIVE_ADDRESS_ROOT)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn verify_proof_rejects_a_wrong_root() {
    let addresses = write_addresses(5);
    let output = claim_utils()
        .arg("generate-proof")
        .arg("--addresses-file")
        .arg(addresses.path())
        .arg("--address")
        .arg(format!("0x{:064x}", 2))
        .output()
        .expect("must run generate-proof");
    assert!(output.status.success());

    let mut payload_file = tempfile::NamedTempFile::new().expect("must create a temp file");
    payload_file
        .write_all(&output.stdout)
        .expect("must write the payload");

    claim_utils()
        .arg("verify-proof")
        .arg("--payload-file")
        .arg(payload_file.path())
        .arg("--root")
        .arg(format!("{:064x}", 0))
        .assert()
        .failure();
}

#[test]
fn generate_proof_for_an_absent_address_fails() {
    let addresses = write_addresses(5);
    claim_utils()
        .arg("generate-proof")
        .arg("--addresses-file")
        .arg(addresses.path())
        .arg("--address")
        .arg(format!("0x{:064x}", 99))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in the campaign target set"));
}
