//! Normalization of submission-model wire records into a canonical [`Operation`].

use account_abi::{
    gateway::{IGatewayAccount, PackedUserOperation},
    sequencer::Transaction,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use tracing::trace;

use crate::{Operation, OperationKind};

/// Error raised for a structurally malformed wire record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The Gateway call data is neither empty nor an ABI-encoded `execute` call.
    #[error("call data is not an `execute` call: {0}")]
    MalformedCallData(String),
    /// A 256-bit word meant to hold an address has bits set above the low 160.
    #[error("`{field}` does not fit in an address")]
    AddressOverflow {
        /// The offending field.
        field: &'static str,
    },
}

/// Context hashes supplied by the dispatcher alongside a wire record.
///
/// Both submission models pass two hashes to the account. Neither model uses them for the
/// signature digest; the account derives its own from the normalized operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextHashes {
    /// The dispatcher's hash of the record (`userOpHash` / `txHash`).
    pub primary: B256,
    /// The hash the dispatcher suggests was signed, if any.
    pub suggested: B256,
}

impl ContextHashes {
    /// Creates a new pair of context hashes.
    pub const fn new(primary: B256, suggested: B256) -> Self {
        Self { primary, suggested }
    }
}

/// A variant-specific wire record that can be normalized into an [`Operation`].
pub trait WireRecord {
    /// The submission model this record belongs to.
    const KIND: OperationKind;

    /// Converts the record into its canonical form. Has no side effects.
    fn normalize(&self, context: ContextHashes) -> Result<Operation, NormalizeError>;
}

impl WireRecord for PackedUserOperation {
    const KIND: OperationKind = OperationKind::Gateway;

    fn normalize(&self, context: ContextHashes) -> Result<Operation, NormalizeError> {
        trace!(target: "smart_account::normalize", primary = %context.primary, "normalizing user operation");

        let (target, value, payload) = if self.callData.is_empty() {
            (Address::ZERO, U256::ZERO, Bytes::new())
        } else {
            let call = IGatewayAccount::executeCall::abi_decode(&self.callData, true)
                .map_err(|e| NormalizeError::MalformedCallData(e.to_string()))?;
            (call.dest, call.value, call.functionData)
        };

        let (verification_gas_limit, call_gas_limit) = unpack_u128_pair(self.accountGasLimits);
        let (_max_priority_fee_per_gas, max_fee_per_gas) = unpack_u128_pair(self.gasFees);
        let fee_limit = U256::from(verification_gas_limit)
            .saturating_add(U256::from(call_gas_limit))
            .saturating_add(self.preVerificationGas);

        Ok(Operation {
            kind: Self::KIND,
            sender: self.sender,
            nonce: self.nonce,
            target,
            value,
            payload,
            signature: self.signature.clone(),
            fee_limit,
            fee_per_unit: U256::from(max_fee_per_gas),
        })
    }
}

impl WireRecord for Transaction {
    const KIND: OperationKind = OperationKind::Sequencer;

    fn normalize(&self, context: ContextHashes) -> Result<Operation, NormalizeError> {
        trace!(target: "smart_account::normalize", primary = %context.primary, "normalizing transaction");

        Ok(Operation {
            kind: Self::KIND,
            sender: word_to_address(self.from, "from")?,
            nonce: self.nonce,
            target: word_to_address(self.to, "to")?,
            value: self.value,
            payload: self.data.clone(),
            signature: self.signature.clone(),
            fee_limit: self.gasLimit,
            fee_per_unit: self.maxFeePerGas,
        })
    }
}

/// Packs two 128-bit values into one word, `high ‖ low`.
pub fn pack_u128_pair(high: u128, low: u128) -> B256 {
    let mut word = [0u8; 32];
    word[..16].copy_from_slice(&high.to_be_bytes());
    word[16..].copy_from_slice(&low.to_be_bytes());
    B256::from(word)
}

/// Splits a word into its high and low 128-bit halves.
pub fn unpack_u128_pair(word: B256) -> (u128, u128) {
    let mut high = [0u8; 16];
    let mut low = [0u8; 16];
    high.copy_from_slice(&word[..16]);
    low.copy_from_slice(&word[16..]);
    (u128::from_be_bytes(high), u128::from_be_bytes(low))
}

/// Widens an address into the 256-bit word layout used by Sequencer transactions.
pub fn address_to_word(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

fn word_to_address(word: U256, field: &'static str) -> Result<Address, NormalizeError> {
    let bytes = word.to_be_bytes::<32>();
    if bytes[..12].iter().any(|byte| *byte != 0) {
        return Err(NormalizeError::AddressOverflow { field });
    }
    Ok(Address::from_slice(&bytes[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};

    const ACCOUNT: Address = address!("0x1000000000000000000000000000000000000001");
    const TARGET: Address = address!("0x2000000000000000000000000000000000000002");

    fn user_operation(call_data: Bytes) -> PackedUserOperation {
        PackedUserOperation {
            sender: ACCOUNT,
            nonce: U256::from(3),
            initCode: Bytes::new(),
            callData: call_data,
            accountGasLimits: pack_u128_pair(100_000, 50_000),
            preVerificationGas: U256::from(21_000),
            gasFees: pack_u128_pair(1, 10),
            paymasterAndData: Bytes::new(),
            signature: bytes!("01"),
        }
    }

    fn transaction() -> Transaction {
        Transaction {
            txType: U256::from(113),
            from: address_to_word(ACCOUNT),
            to: address_to_word(TARGET),
            gasLimit: U256::from(171_000),
            gasPerPubdataByteLimit: U256::from(800),
            maxFeePerGas: U256::from(10),
            maxPriorityFeePerGas: U256::from(1),
            paymaster: U256::ZERO,
            nonce: U256::from(3),
            value: U256::from(9),
            reserved: [U256::ZERO; 4],
            data: bytes!("a0712d68"),
            signature: bytes!("01"),
            factoryDeps: Vec::new(),
            paymasterInput: Bytes::new(),
            reservedDynamic: Bytes::new(),
        }
    }

    #[test]
    fn test_u128_pair_round_trip() {
        let word = pack_u128_pair(u128::MAX, 42);
        assert_eq!(unpack_u128_pair(word), (u128::MAX, 42));
    }

    #[test]
    fn test_user_operation_decodes_execute_call() {
        let call_data = IGatewayAccount::executeCall {
            dest: TARGET,
            value: U256::from(9),
            functionData: bytes!("a0712d68"),
        }
        .abi_encode();
        let op = user_operation(call_data.into()).normalize(ContextHashes::default()).unwrap();

        assert_eq!(op.kind, OperationKind::Gateway);
        assert_eq!(op.sender, ACCOUNT);
        assert_eq!(op.target, TARGET);
        assert_eq!(op.value, U256::from(9));
        assert_eq!(op.payload, bytes!("a0712d68"));
        assert_eq!(op.fee_limit, U256::from(171_000));
        assert_eq!(op.fee_per_unit, U256::from(10));
    }

    #[test]
    fn test_user_operation_with_empty_call_data_has_no_target() {
        let op = user_operation(Bytes::new()).normalize(ContextHashes::default()).unwrap();
        assert!(op.call().is_none());
        assert_eq!(op.value, U256::ZERO);
    }

    #[test]
    fn test_user_operation_rejects_foreign_call_data() {
        let err = user_operation(bytes!("deadbeef")).normalize(ContextHashes::default());
        assert!(matches!(err, Err(NormalizeError::MalformedCallData(_))));
    }

    #[test]
    fn test_transaction_projects_onto_operation() {
        let op = transaction().normalize(ContextHashes::default()).unwrap();
        assert_eq!(op.kind, OperationKind::Sequencer);
        assert_eq!(op.sender, ACCOUNT);
        assert_eq!(op.target, TARGET);
        assert_eq!(op.required_balance(), U256::from(9 + 171_000 * 10));
    }

    #[test]
    fn test_transaction_rejects_oversized_address_word() {
        let mut tx = transaction();
        tx.to = U256::MAX;
        assert_eq!(
            tx.normalize(ContextHashes::default()),
            Err(NormalizeError::AddressOverflow { field: "to" })
        );
    }

    #[test]
    fn test_digest_ignores_context_hashes_and_unsigned_artifacts() {
        let call_data: Bytes = IGatewayAccount::executeCall {
            dest: TARGET,
            value: U256::ZERO,
            functionData: Bytes::new(),
        }
        .abi_encode()
        .into();
        let plain = user_operation(call_data.clone());
        let mut decorated = user_operation(call_data);
        decorated.initCode = bytes!("ff");
        decorated.signature = bytes!("0202");

        let a = plain.normalize(ContextHashes::default()).unwrap();
        let b = decorated.normalize(ContextHashes::new(B256::repeat_byte(1), B256::repeat_byte(2)));
        assert_eq!(a.hash(), b.unwrap().hash());
    }
}
