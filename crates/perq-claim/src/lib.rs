//! Campaign reward-claim proofs over a committed target-address set.
//!
//! A campaign commits the merkle root of its target-address list on-chain.
//! To claim a token reward, a wallet submits an inclusion proof showing that
//! its address belongs to the committed set. This crate owns the boundary
//! between the campaign subsystem and [`perq_merkle`]: it canonicalizes
//! wallet-address strings into the byte form the on-chain verifier hashes,
//! builds the target set's tree, and assembles the claim payload
//! (hex-encoded root, leaf hash, and sibling path, plus the zero-based leaf
//! index the contract pairs with the reward amount).
//!
//! ```
//! use perq_claim::TargetSet;
//!
//! let target_set = TargetSet::from_addresses([
//!     "0x00000000000000000000000000000000000000000000000000000000000000aa",
//!     "0x00000000000000000000000000000000000000000000000000000000000000bb",
//! ])
//! .expect("two well-formed addresses");
//!
//! let claim = target_set
//!     .claim_for("0x00000000000000000000000000000000000000000000000000000000000000bb")
//!     .expect("the address is in the target set");
//! assert_eq!(1, claim.index());
//! assert!(claim.verify(target_set.root()));
//! ```

use perq_merkle::{
    hash_leaf,
    Proof,
    Tree,
};
use serde::{
    Deserialize,
    Serialize,
};
use tracing::warn;

/// Base units per whole reward token; reward amounts travel on-chain as
/// fixed-point integers at this scale.
pub const BASE_UNITS_PER_TOKEN: u64 = 100_000_000;

/// Converts a display amount of reward tokens to base units, rounding to the
/// nearest unit.
#[must_use]
pub fn to_base_units(display_amount: f64) -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let units = (display_amount * BASE_UNITS_PER_TOKEN as f64).round() as u64;
    units
}

/// Strips the optional `0x` marker from `address` and decodes the remainder
/// as hex into the canonical byte representation the on-chain verifier
/// hashes.
///
/// # Errors
/// Returns a malformed-address error if the remainder is not valid hex. A
/// parse failure is never mapped to a sentinel value: an empty leaf would
/// corrupt tree construction without detection.
pub fn canonical_address_bytes(address: &str) -> Result<Vec<u8>, Error> {
    let digits = address.strip_prefix("0x").unwrap_or(address);
    hex::decode(digits).map_err(|source| Error::malformed_address(address, source))
}

/// Derives the merkle leaf hash for a wallet address: sha3-256 over its
/// canonical bytes.
///
/// # Errors
/// Returns a malformed-address error if `address` is not valid hex after
/// prefix stripping.
pub fn address_leaf_hash(address: &str) -> Result<[u8; 32], Error> {
    Ok(hash_leaf(&canonical_address_bytes(address)?))
}

/// A campaign's committed target-address set.
///
/// Rebuilt on demand from the campaign record's stored address list; the
/// tree is never persisted. Address order is significant: a leaf's position
/// in the input list is the index reported in its claim payload.
#[derive(Clone, Debug)]
pub struct TargetSet {
    tree: Tree,
}

impl TargetSet {
    /// Builds the target set from the campaign's ordered address list.
    ///
    /// Duplicate addresses are not rejected here; claims against a
    /// duplicated address resolve to the first occurrence's index. Whether
    /// duplicates should be refused at campaign creation is a decision of
    /// the campaign subsystem.
    ///
    /// # Errors
    /// Returns an error if any address is not valid hex or if the list is
    /// empty. Both indicate an upstream data-integrity problem and are
    /// logged as anomalies.
    pub fn from_addresses<I, S>(addresses: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut leaves = Vec::new();
        for address in addresses {
            let address = address.as_ref();
            match address_leaf_hash(address) {
                Ok(leaf) => leaves.push(leaf),
                Err(error) => {
                    warn!(address, "campaign target list contains a malformed address");
                    return Err(error);
                }
            }
        }
        let tree = Tree::from_leaf_hashes(leaves).map_err(|source| {
            warn!("campaign target list is empty");
            Error::empty_target_set(source)
        })?;
        Ok(Self {
            tree,
        })
    }

    /// Returns the root committed on-chain for this target set.
    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        self.tree.root()
    }

    /// Returns the committed root as lowercase hex.
    #[must_use]
    pub fn root_hex(&self) -> String {
        hex::encode(self.tree.root())
    }

    /// Returns the number of addresses in the target set.
    #[must_use]
    pub fn address_count(&self) -> usize {
        self.tree.leaf_count()
    }

    /// Assembles the claim payload proving that `address` belongs to this
    /// target set.
    ///
    /// # Errors
    /// Returns a not-eligible error if the address is absent from the set;
    /// claim endpoints map this to a user-facing rejection (see
    /// [`Error::is_not_eligible`]) rather than a server fault. Returns a
    /// malformed-address error if `address` is not valid hex.
    pub fn claim_for(&self, address: &str) -> Result<ClaimProof, Error> {
        let leaf_hash = address_leaf_hash(address)?;
        let index = self
            .tree
            .find_leaf(&leaf_hash)
            .ok_or_else(|| Error::not_eligible(address))?;
        let proof = self
            .tree
            .construct_proof(index)
            .expect("the index was returned by find_leaf and is inside the tree");
        Ok(ClaimProof {
            root: self.tree.root(),
            index: index as u64,
            proof: proof.audit_path().to_vec(),
            leaf_hash,
            amount: None,
        })
    }
}

/// The payload submitted to the claim contract alongside a reward claim.
///
/// All hashes are serialized as lowercase hex without a `0x` marker. The
/// reward `amount` is in base units (see [`BASE_UNITS_PER_TOKEN`]) and is
/// produced by the campaign business layer, not by the tree; it is omitted
/// from the serialized form when unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimProof {
    #[serde(with = "hex::serde")]
    root: [u8; 32],
    index: u64,
    #[serde(with = "hash_sequence")]
    proof: Vec<[u8; 32]>,
    #[serde(with = "hex::serde")]
    leaf_hash: [u8; 32],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    amount: Option<u64>,
}

impl ClaimProof {
    /// Returns the payload with the reward amount set, in base units.
    #[must_use]
    pub fn with_amount(self, amount: u64) -> Self {
        Self {
            amount: Some(amount),
            ..self
        }
    }

    /// Returns the root this payload was generated against.
    #[must_use]
    pub fn root(&self) -> [u8; 32] {
        self.root
    }

    /// Returns the zero-based position of the claiming address in the
    /// campaign's ordered target list.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the ordered sibling hashes of the inclusion proof.
    #[must_use]
    pub fn proof(&self) -> &[[u8; 32]] {
        &self.proof
    }

    /// Returns the leaf hash of the claiming address.
    #[must_use]
    pub fn leaf_hash(&self) -> [u8; 32] {
        self.leaf_hash
    }

    /// Returns the reward amount in base units, if set.
    #[must_use]
    pub fn amount(&self) -> Option<u64> {
        self.amount
    }

    /// Returns `true` iff the payload's leaf hash recomputes `expected_root`
    /// under its inclusion proof.
    #[must_use]
    pub fn verify(&self, expected_root: [u8; 32]) -> bool {
        #[allow(clippy::cast_possible_truncation)]
        let proof = Proof::from_parts(self.proof.clone(), self.index as usize);
        proof
            .audit()
            .with_root(expected_root)
            .with_leaf_hash(self.leaf_hash)
            .perform()
    }
}

/// Serializes a sequence of 32-byte hashes as a list of lowercase hex
/// strings.
///
/// To be used in `#[serde(with = "hash_sequence")]` attributes.
mod hash_sequence {
    use serde::{
        de::Error as _,
        Deserialize as _,
        Deserializer,
        Serializer,
    };

    pub(crate) fn serialize<S: Serializer>(
        hashes: &[[u8; 32]],
        se: S,
    ) -> Result<S::Ok, S::Error> {
        se.collect_seq(hashes.iter().map(hex::encode))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Vec<[u8; 32]>, D::Error> {
        let strings = Vec::<String>::deserialize(de)?;
        strings
            .into_iter()
            .map(|s| {
                let bytes = hex::decode(&s).map_err(D::Error::custom)?;
                <[u8; 32]>::try_from(bytes.as_slice())
                    .map_err(|_| D::Error::custom("expected a 32-byte hash"))
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// Returns `true` if the error means the address is simply not in the
    /// campaign's target set, i.e. the claim should be rejected as not
    /// eligible rather than reported as an internal fault.
    #[must_use]
    pub fn is_not_eligible(&self) -> bool {
        matches!(
            self.0,
            ErrorKind::AddressNotEligible {
                ..
            }
        )
    }

    fn malformed_address(address: &str, source: hex::FromHexError) -> Self {
        Self(ErrorKind::MalformedAddress {
            address: address.to_string(),
            source,
        })
    }

    fn empty_target_set(source: perq_merkle::EmptyTree) -> Self {
        Self(ErrorKind::EmptyTargetSet {
            source,
        })
    }

    fn not_eligible(address: &str) -> Self {
        Self(ErrorKind::AddressNotEligible {
            address: address.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
enum ErrorKind {
    #[error("address `{address}` is not valid hex after stripping the 0x marker")]
    MalformedAddress {
        address: String,
        source: hex::FromHexError,
    },
    #[error("campaign target list contains no addresses")]
    EmptyTargetSet { source: perq_merkle::EmptyTree },
    #[error("address `{address}` is not in the campaign target set")]
    AddressNotEligible { address: String },
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::{
        address_leaf_hash,
        to_base_units,
        ClaimProof,
        Error,
        ErrorKind,
        TargetSet,
    };

    const FIVE_ADDRESS_ROOT: [u8; 32] =
        hex!("49e4393a139ea5c977d55127dc7dff99db74354958ca649978d932018fed965e");

    /// 64-hex-digit addresses `0x00..01` through `0x00..0n`.
    fn test_addresses(n: u8) -> Vec<String> {
        (1..=n).map(|i| format!("0x{i:064x}")).collect()
    }

    fn five_address_set() -> TargetSet {
        TargetSet::from_addresses(test_addresses(5)).expect("five well-formed addresses")
    }

    #[test]
    fn leaf_hash_matches_fixture() {
        let expected = hex!("b79151ec5d30a80b78789805f293fa4fb8fd1eebc0c9367e7c9106678a893df1");
        assert_eq!(
            expected,
            address_leaf_hash(&format!("0x{:064x}", 1)).unwrap(),
        );
    }

    #[test]
    fn prefix_marker_is_optional() {
        let with_marker = address_leaf_hash(&format!("0x{:064x}", 1)).unwrap();
        let without_marker = address_leaf_hash(&format!("{:064x}", 1)).unwrap();
        assert_eq!(with_marker, without_marker);
    }

    #[test]
    fn malformed_address_is_an_error_not_a_sentinel() {
        let error = address_leaf_hash("0xnot-hex").expect_err("invalid hex must not hash");
        assert!(!error.is_not_eligible());
        let Error(ErrorKind::MalformedAddress {
            address, ..
        }) = &error
        else {
            panic!("expected ErrorKind::MalformedAddress, got {error:?}");
        };
        assert_eq!("0xnot-hex", address);
    }

    #[test]
    fn empty_target_list_is_rejected() {
        let error = TargetSet::from_addresses(Vec::<String>::new())
            .expect_err("an empty target list must not build");
        let Error(ErrorKind::EmptyTargetSet {
            ..
        }) = error
        else {
            panic!("expected ErrorKind::EmptyTargetSet, got {error:?}");
        };
    }

    #[test]
    fn committed_root_matches_fixture() {
        assert_eq!(FIVE_ADDRESS_ROOT, five_address_set().root());
        assert_eq!(hex::encode(FIVE_ADDRESS_ROOT), five_address_set().root_hex());
    }

    #[test]
    fn claim_for_member_address_verifies() {
        let target_set = five_address_set();
        let claim = target_set
            .claim_for(&format!("0x{:064x}", 3))
            .expect("address 3 is in the target set");
        assert_eq!(FIVE_ADDRESS_ROOT, claim.root());
        assert_eq!(2, claim.index());
        assert_eq!(3, claim.proof().len());
        assert!(claim.verify(target_set.root()));
        assert!(!claim.verify([0u8; 32]));
    }

    #[test]
    fn claim_for_absent_address_is_not_eligible() {
        let error = five_address_set()
            .claim_for(&format!("0x{:064x}", 99))
            .expect_err("address 99 is not in the target set");
        assert!(error.is_not_eligible());
    }

    #[test]
    fn duplicate_addresses_resolve_to_the_first_occurrence() {
        let mut addresses = test_addresses(3);
        addresses.push(addresses[0].clone());
        let target_set =
            TargetSet::from_addresses(&addresses).expect("four well-formed addresses");
        assert_eq!(4, target_set.address_count());
        let claim = target_set
            .claim_for(&addresses[0])
            .expect("the duplicated address is in the target set");
        assert_eq!(0, claim.index());
        assert!(claim.verify(target_set.root()));
    }

    #[test]
    fn claim_payload_round_trips_through_json() {
        let claim = five_address_set()
            .claim_for(&format!("0x{:064x}", 1))
            .expect("address 1 is in the target set")
            .with_amount(to_base_units(1.5));

        let json = serde_json::to_string(&claim).expect("payload must serialize");
        assert!(json.contains(&hex::encode(FIVE_ADDRESS_ROOT)));
        assert!(json.contains("150000000"));

        let deserialized: ClaimProof =
            serde_json::from_str(&json).expect("payload must deserialize");
        assert_eq!(claim, deserialized);
    }

    #[test]
    fn display_amounts_scale_to_base_units() {
        assert_eq!(150_000_000, to_base_units(1.5));
        assert_eq!(0, to_base_units(0.0));
        assert_eq!(1, to_base_units(0.000_000_012));
    }
}
