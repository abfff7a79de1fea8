//! The Sequencer-bootloader account.
//!
//! The bootloader drives three separate calls: validate, pay for, and execute a transaction.
//! Execution re-runs validation, so the owner calling [`SequencerAccount::execute_transaction`]
//! directly gets the same guarantees as the bootloader path.

use account_abi::sequencer::Transaction;
use alloy_primitives::{map::HashMap, Address, B256, U256};
use tracing::debug;

use crate::{
    dispatch_call, validate_operation, AccountConfig, AccountError, CallerGate, ContextHashes,
    Host, NonceCheck, Operation, OperationKind, Settlement, ValidationResult, WireRecord,
};

/// How many nonces an accepted operation may fall behind the ledger before it is dropped from
/// the pending set. Executing a dropped operation later fails on its consumed nonce.
pub const PENDING_NONCE_WINDOW: u64 = 16;

/// An operation accepted by `validate_transaction` and not executed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    nonce: U256,
    settled_fee: U256,
}

/// An account driven by the bootloader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerAccount {
    config: AccountConfig,
    /// Accepted operations by hash, whose nonce is consumed but which have not been executed.
    /// Holds at most [`PENDING_NONCE_WINDOW`] entries, one per recent nonce.
    validated: HashMap<B256, Pending>,
}

impl SequencerAccount {
    /// The submission model of this account.
    pub const KIND: OperationKind = OperationKind::Sequencer;

    /// Creates an account. The configuration cannot change afterwards.
    pub fn new(config: AccountConfig) -> Self {
        Self { config, validated: HashMap::default() }
    }

    /// The account's configuration.
    pub const fn config(&self) -> &AccountConfig {
        &self.config
    }

    /// Whether an accepted operation with this hash is waiting to be executed.
    pub fn is_pending(&self, hash: &B256) -> bool {
        self.validated.contains_key(hash)
    }

    /// The fee paid so far for a pending operation.
    pub fn settled_fee(&self, hash: &B256) -> Option<U256> {
        self.validated.get(hash).map(|pending| pending.settled_fee)
    }

    /// Validates `transaction`: nonce, then balance, then signature.
    ///
    /// Only the bootloader may call. A non-owner signature yields
    /// [`ValidationResult::Rejected`]; the nonce is consumed either way.
    pub fn validate_transaction<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        caller: Address,
        context: ContextHashes,
        transaction: &Transaction,
    ) -> Result<ValidationResult, AccountError> {
        CallerGate::OnlyDispatcher.check(caller, &self.config, "validateTransaction")?;

        let op = transaction.normalize(context)?;
        let result = validate_operation(&self.config, host, &op, NonceCheck::Consume)?;
        if result.is_accepted() {
            self.validated.insert(op.hash(), Pending { nonce: op.nonce, settled_fee: U256::ZERO });
        }
        self.prune_pending(host.current_nonce(self.config.address));

        debug!(target: "smart_account::sequencer", account = %self.config.address, nonce = %op.nonce, accepted = result.is_accepted(), "transaction validated");
        Ok(result)
    }

    /// Pays `gas_limit * max_fee_per_gas` to the bootloader. Protocol-internal, ungated.
    ///
    /// The amount is recorded against the pending operation, if any, and credited when it is
    /// revalidated at execution.
    pub fn pay_for_transaction<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        context: ContextHashes,
        transaction: &Transaction,
    ) -> Result<U256, AccountError> {
        let op = transaction.normalize(context)?;
        let paid = Settlement::Pull.settle(&self.config, host, &op)?;
        if let Some(pending) = self.validated.get_mut(&op.hash()) {
            pending.settled_fee = pending.settled_fee.saturating_add(paid);
        }
        Ok(paid)
    }

    /// Revalidates and executes `transaction`. The bootloader or the owner may call.
    ///
    /// An operation previously accepted by [`Self::validate_transaction`] is revalidated
    /// without consuming its nonce again; anything else goes through the full sequence. Either
    /// way an operation executes at most once. The target's revert output is discarded.
    pub fn execute_transaction<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        caller: Address,
        context: ContextHashes,
        transaction: &Transaction,
    ) -> Result<(), AccountError> {
        CallerGate::DispatcherOrOwner.check(caller, &self.config, "executeTransaction")?;

        let op = transaction.normalize(context)?;
        let nonce_check = match self.validated.remove(&op.hash()) {
            Some(Pending { settled_fee, .. }) => NonceCheck::AlreadyConsumed { settled_fee },
            None => NonceCheck::Consume,
        };
        self.run(host, &op, nonce_check)
    }

    /// Validates and executes `transaction` submitted by anyone, failing with
    /// [`AccountError::InvalidSignature`] unless the owner signed it.
    pub fn execute_transaction_from_outside<H: Host + ?Sized>(
        &self,
        host: &mut H,
        transaction: &Transaction,
    ) -> Result<(), AccountError> {
        let op = transaction.normalize(ContextHashes::default())?;
        self.run(host, &op, NonceCheck::Consume)
    }

    /// Fee-sponsor preparation. Always fails with [`AccountError::NotImplemented`].
    pub fn prepare_for_paymaster(&self) -> Result<(), AccountError> {
        Err(AccountError::NotImplemented)
    }

    /// Drops pending operations more than [`PENDING_NONCE_WINDOW`] nonces behind `current`.
    fn prune_pending(&mut self, current: U256) {
        let floor = current.saturating_sub(U256::from(PENDING_NONCE_WINDOW));
        self.validated.retain(|_, pending| pending.nonce >= floor);
    }

    fn run<H: Host + ?Sized>(
        &self,
        host: &mut H,
        op: &Operation,
        nonce_check: NonceCheck,
    ) -> Result<(), AccountError> {
        let result = validate_operation(&self.config, host, op, nonce_check)?;
        if !result.is_accepted() {
            return Err(AccountError::InvalidSignature);
        }
        dispatch_call(host, self.config.address, Self::KIND, &op.call(), op.budget())?;

        debug!(target: "smart_account::sequencer", account = %self.config.address, nonce = %op.nonce, "transaction executed");
        Ok(())
    }
}
