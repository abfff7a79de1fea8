use account_abi::{gateway::PackedUserOperation, sequencer::Transaction};
use alloy_primitives::{Address, Bytes, B256};
use k256::ecdsa::SigningKey;

use crate::{public_key_to_address, ContextHashes, DigestScheme, Operation, WireRecord};

/// A deterministic secp256k1 key for signing operations in tests.
#[derive(Debug, Clone)]
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    /// Creates a signer whose secret key is `seed` repeated 32 times. `seed` must be nonzero.
    pub fn from_seed(seed: u8) -> Self {
        let key = SigningKey::from_slice(&[seed; 32]).expect("seed yields a valid scalar");
        Self { key }
    }

    /// The signer's address.
    pub fn address(&self) -> Address {
        public_key_to_address(self.key.verifying_key())
    }

    /// Signs `digest` as is, returning `r ‖ s ‖ v` with `v` in `{27, 28}`.
    pub fn sign_digest(&self, digest: B256) -> Bytes {
        let (signature, recovery_id) =
            self.key.sign_prehash_recoverable(digest.as_slice()).expect("signing never fails");
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(27 + recovery_id.to_byte());
        bytes.into()
    }

    /// Returns `op` with its signature set under `scheme`.
    pub fn sign_operation(&self, mut op: Operation, scheme: DigestScheme) -> Operation {
        op.signature = self.sign_digest(scheme.apply(op.hash()));
        op
    }

    /// Signs a user operation in place.
    pub fn sign_user_op(&self, user_op: &mut PackedUserOperation, scheme: DigestScheme) {
        user_op.signature = self.sign_record(user_op, scheme);
    }

    /// Signs a Sequencer transaction in place.
    pub fn sign_transaction(&self, transaction: &mut Transaction, scheme: DigestScheme) {
        transaction.signature = self.sign_record(transaction, scheme);
    }

    fn sign_record<R: WireRecord>(&self, record: &R, scheme: DigestScheme) -> Bytes {
        let op = record.normalize(ContextHashes::default()).expect("well-formed wire record");
        self.sign_digest(scheme.apply(op.hash()))
    }
}
