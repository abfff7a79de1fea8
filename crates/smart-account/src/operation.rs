//! The canonical operation every wire record is normalized into.

use account_abi::digest::CanonicalOperation;
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ACCOUNT_VALIDATION_SUCCESS_MAGIC, DEPLOYER_ADDRESS, SIG_VALIDATION_FAILED,
    SIG_VALIDATION_SUCCESS,
};

/// The submission model an operation arrived through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Forwarded by a relay to the entry point, which calls the account.
    #[display("gateway")]
    Gateway,
    /// Driven directly against the account by the bootloader.
    #[display("sequencer")]
    Sequencer,
}

impl OperationKind {
    /// The discriminant committed to by the operation digest.
    pub const fn id(self) -> u8 {
        match self {
            Self::Gateway => 0,
            Self::Sequencer => 1,
        }
    }

    /// Whether a failed generic call hands the target's revert output back to the caller.
    pub const fn carries_failure_output(self) -> bool {
        matches!(self, Self::Gateway)
    }

    /// The word the dispatcher of this model recognizes as "accepted".
    pub fn success_marker(self) -> B256 {
        match self {
            Self::Gateway => U256::from(SIG_VALIDATION_SUCCESS).into(),
            Self::Sequencer => B256::right_padding_from(&ACCOUNT_VALIDATION_SUCCESS_MAGIC),
        }
    }

    /// The sentinel word returned for an operation that is not accepted.
    pub fn rejection_marker(self) -> B256 {
        match self {
            Self::Gateway => U256::from(SIG_VALIDATION_FAILED).into(),
            Self::Sequencer => B256::ZERO,
        }
    }
}

/// A call the account performs: where to, how much native asset, and with what calldata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Destination. [`Address::ZERO`] encodes "no call".
    pub target: Address,
    /// Native asset forwarded with the call.
    pub value: U256,
    /// Opaque calldata.
    pub payload: Bytes,
}

impl Call {
    /// Creates a new call.
    pub const fn new(target: Address, value: U256, payload: Bytes) -> Self {
        Self { target, value, payload }
    }

    /// Whether the call targets the deployer system contract.
    pub fn is_deployment(&self) -> bool {
        self.target == DEPLOYER_ADDRESS
    }

    /// Whether the call is empty, i.e. has no target.
    pub fn is_none(&self) -> bool {
        self.target.is_zero()
    }
}

/// Canonical in-memory form of a submitted call request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Which submission model produced this operation.
    pub kind: OperationKind,
    /// The account the operation runs as.
    pub sender: Address,
    /// Replay counter value; must equal the ledger's next nonce for the sender.
    pub nonce: U256,
    /// Call destination, zero for none.
    pub target: Address,
    /// Native asset to forward.
    pub value: U256,
    /// Opaque calldata.
    pub payload: Bytes,
    /// Raw signature bytes, `r ‖ s ‖ v`.
    pub signature: Bytes,
    /// Upper bound on fee units the operation may consume.
    pub fee_limit: U256,
    /// Price per fee unit.
    pub fee_per_unit: U256,
}

impl Operation {
    /// The maximum fee the operation may be charged: `fee_limit * fee_per_unit`.
    ///
    /// Saturates instead of overflowing, so an absurd fee can never look affordable.
    pub fn max_fee(&self) -> U256 {
        self.fee_limit.saturating_mul(self.fee_per_unit)
    }

    /// The balance the sender must hold for the operation to pass validation:
    /// `value + fee_limit * fee_per_unit`, identical for both submission models.
    pub fn required_balance(&self) -> U256 {
        self.value.saturating_add(self.max_fee())
    }

    /// The call the operation asks the account to perform.
    pub fn call(&self) -> Call {
        Call::new(self.target, self.value, self.payload.clone())
    }

    /// Computation budget forwarded to the deployment path.
    pub fn budget(&self) -> u64 {
        u64::try_from(self.fee_limit).unwrap_or(u64::MAX)
    }

    /// Hash of the operation's semantic fields. The signature is excluded, as is every encoding
    /// artifact of the wire record the operation came from.
    pub fn hash(&self) -> B256 {
        let canonical = CanonicalOperation {
            kind: self.kind.id(),
            sender: self.sender,
            nonce: self.nonce,
            target: self.target,
            value: self.value,
            payloadHash: keccak256(&self.payload),
            feeLimit: self.fee_limit,
            feePerUnit: self.fee_per_unit,
        };
        keccak256(canonical.abi_encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};

    fn sample() -> Operation {
        Operation {
            kind: OperationKind::Sequencer,
            sender: address!("0x1000000000000000000000000000000000000001"),
            nonce: U256::from(7),
            target: address!("0x2000000000000000000000000000000000000002"),
            value: U256::from(5),
            payload: bytes!("a0712d68"),
            signature: Bytes::new(),
            fee_limit: U256::from(100),
            fee_per_unit: U256::from(3),
        }
    }

    #[test]
    fn test_required_balance_adds_value_and_max_fee() {
        assert_eq!(sample().required_balance(), U256::from(305));
    }

    #[test]
    fn test_required_balance_saturates() {
        let mut op = sample();
        op.fee_limit = U256::MAX;
        op.fee_per_unit = U256::from(2);
        assert_eq!(op.required_balance(), U256::MAX);
    }

    #[test]
    fn test_hash_ignores_signature() {
        let unsigned = sample();
        let mut signed = unsigned.clone();
        signed.signature = Bytes::from(vec![0xab; 65]);
        assert_eq!(unsigned.hash(), signed.hash());
    }

    #[test]
    fn test_hash_commits_to_kind() {
        let sequencer = sample();
        let gateway = Operation { kind: OperationKind::Gateway, ..sequencer.clone() };
        assert_ne!(sequencer.hash(), gateway.hash());
    }

    #[test]
    fn test_hash_survives_json_round_trip() {
        let op = sample();
        let json = serde_json::to_string(&op).unwrap();
        let decoded: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.hash(), op.hash());
    }

    #[test]
    fn test_markers() {
        assert_eq!(OperationKind::Gateway.success_marker(), B256::ZERO);
        assert_eq!(OperationKind::Gateway.rejection_marker(), B256::with_last_byte(1));
        assert_eq!(
            &OperationKind::Sequencer.success_marker()[..4],
            &ACCOUNT_VALIDATION_SUCCESS_MAGIC[..]
        );
        assert_eq!(OperationKind::Sequencer.rejection_marker(), B256::ZERO);
    }
}
