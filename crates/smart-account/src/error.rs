use alloy_primitives::{Address, Bytes, U256};

use crate::NormalizeError;

/// Failures of an account entry point.
///
/// Every variant aborts the entry point. The only effect that survives a failure is nonce
/// consumption, which happens first and is never rolled back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// The caller is not allowed to invoke the entry point. Raised before any state change.
    #[error("caller {caller} may not invoke `{entry_point}`")]
    UnauthorizedCaller {
        /// The rejected caller.
        caller: Address,
        /// The guarded entry point.
        entry_point: &'static str,
    },
    /// The operation belongs to a different account.
    #[error("operation sender {sender} is not account {account}")]
    SenderMismatch {
        /// Sender named by the operation.
        sender: Address,
        /// The account that received it.
        account: Address,
    },
    /// The nonce ledger refused to consume the operation's nonce.
    #[error("nonce {nonce} is not the next nonce of {account} (expected {expected})")]
    NonceMismatch {
        /// The account.
        account: Address,
        /// The nonce the operation carried.
        nonce: U256,
        /// The ledger's current nonce.
        expected: U256,
    },
    /// The account cannot cover `value + fee_limit * fee_per_unit`. The nonce is already burned.
    #[error("required balance {required} exceeds available balance {available}")]
    InsufficientBalance {
        /// Balance the operation requires.
        required: U256,
        /// Balance the account holds.
        available: U256,
    },
    /// The operation was not signed by the owner, on a path that requires acceptance.
    #[error("operation is not signed by the account owner")]
    InvalidSignature,
    /// A generic call failed. Gateway accounts keep the target's revert output.
    #[error("call to {target} failed")]
    ExecutionFailed {
        /// The call target.
        target: Address,
        /// Raw revert output, when the submission model keeps it.
        output: Option<Bytes>,
    },
    /// The deployer reverted. The data is its revert output, unchanged.
    #[error("deployment reverted: {0}")]
    Revert(Bytes),
    /// The fee could not be paid to the dispatcher.
    #[error("failed to pay fee of {amount} to {recipient}")]
    FeeSettlementFailed {
        /// The dispatcher owed the fee.
        recipient: Address,
        /// The fee.
        amount: U256,
    },
    /// Fee sponsorship is an unfinished extension point.
    #[error("fee sponsorship is not implemented")]
    NotImplemented,
    /// The wire record could not be normalized.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
