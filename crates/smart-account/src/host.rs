//! Collaborators the account consumes from its host runtime.
//!
//! The account never owns its nonce or balance; it reaches them, and every other account or
//! contract, through these traits.

use alloy_primitives::{Address, Bytes, U256};
use auto_impl::auto_impl;

/// A failed call, carrying the callee's raw revert output.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("call reverted with {} bytes of output", .output.len())]
pub struct Fault {
    /// Raw revert data.
    pub output: Bytes,
}

impl Fault {
    /// Creates a fault carrying `output`.
    pub fn new(output: impl Into<Bytes>) -> Self {
        Self { output: output.into() }
    }
}

/// The authoritative replay-prevention counter per account.
#[auto_impl(&mut, Box)]
pub trait NonceLedger {
    /// The lowest unused nonce of `account`.
    fn current_nonce(&self, account: Address) -> U256;

    /// Atomically advances the nonce of `account` by one iff it currently equals `nonce`.
    /// Returns whether the nonce was consumed.
    fn consume_if_equals(&mut self, account: Address, nonce: U256) -> bool;
}

/// Tracks spendable native-asset balances.
#[auto_impl(&mut, Box)]
pub trait BalanceAuthority {
    /// Current balance of `account`.
    fn balance(&self, account: Address) -> U256;

    /// Moves `amount` from `from` to `to`. Returns `false`, changing nothing, when `from`
    /// cannot cover it.
    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> bool;
}

/// Performs calls on behalf of an account.
#[auto_impl(&mut, Box)]
pub trait CallHandler {
    /// A generic call from `caller` to `target` carrying `value` and `payload`. Either fully
    /// applies or changes nothing.
    fn call(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        payload: &Bytes,
    ) -> Result<Bytes, Fault>;

    /// A privileged call into the deployer system contract, forwarding `value`, `payload` and
    /// the caller's remaining computation `budget`.
    fn deployer_call(
        &mut self,
        caller: Address,
        value: U256,
        payload: &Bytes,
        budget: u64,
    ) -> Result<Bytes, Fault>;
}

/// Everything an account needs from the runtime hosting it.
pub trait Host: NonceLedger + BalanceAuthority + CallHandler {}

impl<T: NonceLedger + BalanceAuthority + CallHandler + ?Sized> Host for T {}
