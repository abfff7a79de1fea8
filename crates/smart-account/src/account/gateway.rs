//! The Gateway-submitted account.
//!
//! A relay hands a user operation to the entry point, which calls
//! [`validate_user_op`](GatewayAccount::validate_user_op) and then
//! [`execute`](GatewayAccount::execute) with the operation's decoded call. Validation and the
//! prefund push happen in one call; execution is a separate call and does not revalidate.

use account_abi::gateway::PackedUserOperation;
use alloy_primitives::{Address, Bytes, U256};
use tracing::debug;

use crate::{
    dispatch_call, validate_operation, AccountConfig, AccountError, Call, CallerGate,
    ContextHashes, Host, NonceCheck, OperationKind, Settlement, ValidationResult, WireRecord,
};

/// Budget meaning "everything the caller has left", forwarded by [`GatewayAccount::execute`].
pub const REMAINING_BUDGET: u64 = u64::MAX;

/// An account driven by an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayAccount {
    config: AccountConfig,
}

impl GatewayAccount {
    /// The submission model of this account.
    pub const KIND: OperationKind = OperationKind::Gateway;

    /// Creates an account. The configuration cannot change afterwards.
    pub const fn new(config: AccountConfig) -> Self {
        Self { config }
    }

    /// The account's configuration.
    pub const fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// Validates `user_op` and pushes `missing_account_funds` to the entry point.
    ///
    /// Only the entry point may call. A non-owner signature yields
    /// [`ValidationResult::Rejected`]; the nonce is consumed either way. A failed prefund
    /// transfer is not an error.
    pub fn validate_user_op<H: Host + ?Sized>(
        &self,
        host: &mut H,
        caller: Address,
        user_op: &PackedUserOperation,
        context: ContextHashes,
        missing_account_funds: U256,
    ) -> Result<ValidationResult, AccountError> {
        CallerGate::OnlyDispatcher.check(caller, &self.config, "validateUserOp")?;

        let op = user_op.normalize(context)?;
        let result = validate_operation(&self.config, host, &op, NonceCheck::Consume)?;
        Settlement::Push { missing_funds: missing_account_funds }.settle(&self.config, host, &op)?;

        debug!(target: "smart_account::gateway", account = %self.config.address, nonce = %op.nonce, accepted = result.is_accepted(), "user operation validated");
        Ok(result)
    }

    /// Executes `call` without validating anything. The entry point or the owner may call.
    ///
    /// The call is forwarded [`REMAINING_BUDGET`]; the entry point meters execution against
    /// the operation's own limits. On failure the target's revert output is kept in
    /// [`AccountError::ExecutionFailed`].
    pub fn execute<H: Host + ?Sized>(
        &self,
        host: &mut H,
        caller: Address,
        call: &Call,
    ) -> Result<Bytes, AccountError> {
        CallerGate::DispatcherOrOwner.check(caller, &self.config, "execute")?;
        dispatch_call(host, self.config.address, Self::KIND, call, REMAINING_BUDGET)
    }

    /// Validates `user_op` in full and executes its call only if the owner signed it.
    ///
    /// Anyone may submit; no prefund is pushed since no entry point is involved.
    pub fn execute_unescorted<H: Host + ?Sized>(
        &self,
        host: &mut H,
        user_op: &PackedUserOperation,
    ) -> Result<Bytes, AccountError> {
        let op = user_op.normalize(ContextHashes::default())?;
        let result = validate_operation(&self.config, host, &op, NonceCheck::Consume)?;
        if !result.is_accepted() {
            return Err(AccountError::InvalidSignature);
        }
        dispatch_call(host, self.config.address, Self::KIND, &op.call(), op.budget())
    }

    /// Fee-sponsor preparation. Always fails with [`AccountError::NotImplemented`].
    pub fn prepare_fee_sponsor(&self) -> Result<(), AccountError> {
        Err(AccountError::NotImplemented)
    }
}
