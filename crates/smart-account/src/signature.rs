//! Signature authentication: signer recovery from a digest and an `r ‖ s ‖ v` signature.

use alloy_primitives::{eip191_hash_message, keccak256, Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::constants::SIGNATURE_LENGTH;

/// How an operation hash is turned into the digest the owner signs.
///
/// This is chosen per deployment and has no default: accounts and the tooling that signs for
/// them must agree on it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DigestScheme {
    /// The owner signs the operation hash itself.
    Raw,
    /// The owner signs the EIP-191 "signed message" wrapper of the operation hash, as produced
    /// by `personal_sign`.
    EthSignedMessage,
}

impl DigestScheme {
    /// Applies the transform to an operation hash.
    pub fn apply(self, hash: B256) -> B256 {
        match self {
            Self::Raw => hash,
            Self::EthSignedMessage => eip191_hash_message(hash),
        }
    }
}

/// Recovers the address that produced `signature` over `digest`.
///
/// Returns `None` for anything that is not a recoverable 65-byte signature with `v` in
/// `{0, 1, 27, 28}`. Pure; no side effects.
pub fn recover_signer(digest: B256, signature: &[u8]) -> Option<Address> {
    if signature.len() != SIGNATURE_LENGTH {
        return None;
    }

    let parity = match signature[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        _ => return None,
    };
    let recovery_id = RecoveryId::try_from(parity).ok()?;
    let signature = Signature::from_slice(&signature[..64]).ok()?;
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id).ok()?;

    Some(public_key_to_address(&key))
}

/// Derives the address of a public key: the last 20 bytes of `keccak256(x ‖ y)`.
pub fn public_key_to_address(key: &VerifyingKey) -> Address {
    // Uncompressed point is 0x04 ‖ x ‖ y
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestSigner;

    #[test]
    fn test_recovers_signer_with_both_v_encodings() {
        let signer = TestSigner::from_seed(7);
        let digest = keccak256(b"operation");
        let mut signature = signer.sign_digest(digest).to_vec();

        assert_eq!(recover_signer(digest, &signature), Some(signer.address()));

        signature[64] -= 27;
        assert_eq!(recover_signer(digest, &signature), Some(signer.address()));
    }

    #[test]
    fn test_other_digest_recovers_other_address() {
        let signer = TestSigner::from_seed(7);
        let signature = signer.sign_digest(keccak256(b"operation"));
        assert_ne!(recover_signer(keccak256(b"tampered"), &signature), Some(signer.address()));
    }

    #[test]
    fn test_malformed_signatures_are_unrecoverable() {
        let digest = keccak256(b"operation");
        assert_eq!(recover_signer(digest, &[]), None);
        assert_eq!(recover_signer(digest, &[1u8; 64]), None);

        let mut bad_v = TestSigner::from_seed(7).sign_digest(digest).to_vec();
        bad_v[64] = 29;
        assert_eq!(recover_signer(digest, &bad_v), None);

        assert_eq!(recover_signer(digest, &[0u8; 65]), None);
    }

    #[test]
    fn test_eth_signed_message_wraps_hash() {
        let hash = keccak256(b"operation");
        assert_eq!(DigestScheme::Raw.apply(hash), hash);
        assert_eq!(DigestScheme::EthSignedMessage.apply(hash), eip191_hash_message(hash));
        assert_ne!(DigestScheme::EthSignedMessage.apply(hash), hash);
    }
}
