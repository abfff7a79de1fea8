use alloy_primitives::{map::HashMap, Address, Bytes, U256};
use delegate::delegate;
use serde::Serialize;
use tracing::trace;

use crate::{constants::DEPLOYER_ADDRESS, BalanceAuthority, CallHandler, Fault, NonceLedger};

use super::{CallContext, Contract, ContractDeployer, MemoryBalances, MemoryNonceLedger};

/// Which call path a [`CallRecord`] went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CallKind {
    /// A generic call.
    Generic,
    /// A privileged call into the deployer.
    Deployer,
}

/// A call the host performed, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// The path taken.
    pub kind: CallKind,
    /// The caller.
    pub caller: Address,
    /// The callee.
    pub target: Address,
    /// Native asset sent.
    pub value: U256,
    /// Calldata.
    pub payload: Bytes,
    /// Budget forwarded, zero for generic calls.
    pub budget: u64,
    /// Whether the call succeeded.
    pub success: bool,
}

/// A host runtime kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    nonces: MemoryNonceLedger,
    balances: MemoryBalances,
    contracts: HashMap<Address, Box<dyn Contract>>,
    trace: Vec<CallRecord>,
}

impl InMemoryHost {
    /// Creates a host with the deployer system contract installed.
    pub fn with_system_contracts() -> Self {
        Self::default().contract(DEPLOYER_ADDRESS, ContractDeployer::default())
    }

    /// Sets the balance of an account.
    pub fn set_account_balance(&mut self, address: Address, balance: U256) {
        self.balances.set(address, balance);
    }

    /// Sets the balance of an account.
    pub fn account_balance(mut self, address: Address, balance: U256) -> Self {
        self.set_account_balance(address, balance);
        self
    }

    /// Sets the next nonce of an account.
    pub fn set_account_nonce(&mut self, address: Address, nonce: U256) {
        self.nonces.set(address, nonce);
    }

    /// Sets the next nonce of an account.
    pub fn account_nonce(mut self, address: Address, nonce: U256) -> Self {
        self.set_account_nonce(address, nonce);
        self
    }

    /// Installs a contract at `address`, replacing any previous one.
    pub fn insert_contract(&mut self, address: Address, contract: impl Contract + 'static) {
        self.contracts.insert(address, Box::new(contract));
    }

    /// Installs a contract at `address`, replacing any previous one.
    pub fn contract(mut self, address: Address, contract: impl Contract + 'static) -> Self {
        self.insert_contract(address, contract);
        self
    }

    /// Every call performed so far, in order.
    pub fn trace(&self) -> &[CallRecord] {
        &self.trace
    }

    /// Calls `target` with no value and without recording the call. Meant for reads.
    pub fn static_call(&mut self, target: Address, payload: &Bytes) -> Result<Bytes, Fault> {
        self.invoke(Address::ZERO, target, U256::ZERO, payload, 0, false)
    }

    /// Moves the value, then runs the contract at `target` if there is one. A failing contract
    /// gets its value back.
    fn invoke(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        payload: &Bytes,
        budget: u64,
        system: bool,
    ) -> Result<Bytes, Fault> {
        if !self.balances.transfer(caller, target, value) {
            return Err(Fault::default());
        }
        let Some(contract) = self.contracts.get_mut(&target) else {
            return Ok(Bytes::new());
        };

        let ctx = CallContext { caller, address: target, value, budget, system };
        let result = contract.call(&ctx, payload);
        if result.is_err() {
            let refunded = self.balances.transfer(target, caller, value);
            debug_assert!(refunded, "value just received must be refundable");
        }
        result
    }

    fn record(&mut self, record: CallRecord) {
        trace!(target: "smart_account::sim", ?record, "call");
        self.trace.push(record);
    }
}

impl NonceLedger for InMemoryHost {
    delegate! {
        to self.nonces {
            fn current_nonce(&self, account: Address) -> U256;
            fn consume_if_equals(&mut self, account: Address, nonce: U256) -> bool;
        }
    }
}

impl BalanceAuthority for InMemoryHost {
    delegate! {
        to self.balances {
            fn balance(&self, account: Address) -> U256;
            fn transfer(&mut self, from: Address, to: Address, amount: U256) -> bool;
        }
    }
}

impl CallHandler for InMemoryHost {
    fn call(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        payload: &Bytes,
    ) -> Result<Bytes, Fault> {
        let result = self.invoke(caller, target, value, payload, 0, false);
        self.record(CallRecord {
            kind: CallKind::Generic,
            caller,
            target,
            value,
            payload: payload.clone(),
            budget: 0,
            success: result.is_ok(),
        });
        result
    }

    fn deployer_call(
        &mut self,
        caller: Address,
        value: U256,
        payload: &Bytes,
        budget: u64,
    ) -> Result<Bytes, Fault> {
        let result = if self.contracts.contains_key(&DEPLOYER_ADDRESS) {
            self.invoke(caller, DEPLOYER_ADDRESS, value, payload, budget, true)
        } else {
            Err(Fault::default())
        };
        self.record(CallRecord {
            kind: CallKind::Deployer,
            caller,
            target: DEPLOYER_ADDRESS,
            value,
            payload: payload.clone(),
            budget,
            success: result.is_ok(),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Token;
    use account_abi::token::IMintableToken;
    use alloy_primitives::{address, bytes};
    use alloy_sol_types::SolCall;

    const CALLER: Address = address!("0x1000000000000000000000000000000000000001");
    const TOKEN: Address = address!("0x5000000000000000000000000000000000000005");

    #[test]
    fn test_failed_call_refunds_value() {
        let mut host = InMemoryHost::default()
            .account_balance(CALLER, U256::from(10))
            .contract(TOKEN, Token::default());

        assert!(host.call(CALLER, TOKEN, U256::from(4), &bytes!("deadbeef")).is_err());
        assert_eq!(host.balance(CALLER), U256::from(10));
        assert_eq!(host.balance(TOKEN), U256::ZERO);
        assert!(!host.trace()[0].success);
    }

    #[test]
    fn test_underfunded_call_fails() {
        let mut host = InMemoryHost::default().account_balance(CALLER, U256::from(1));
        assert_eq!(host.call(CALLER, TOKEN, U256::from(2), &Bytes::new()), Err(Fault::default()));
    }

    #[test]
    fn test_static_call_is_not_recorded() {
        let mut host = InMemoryHost::default().contract(TOKEN, Token::default());
        let query = IMintableToken::balanceOfCall { owner: CALLER }.abi_encode().into();
        host.static_call(TOKEN, &query).unwrap();
        assert!(host.trace().is_empty());
    }

    #[test]
    fn test_deployer_call_without_deployer_fails() {
        let mut host = InMemoryHost::default();
        assert!(host.deployer_call(CALLER, U256::ZERO, &Bytes::new(), 1).is_err());
        assert_eq!(host.trace()[0].kind, CallKind::Deployer);
    }
}
