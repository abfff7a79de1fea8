//! Execution of the account's requested call.
//!
//! A call is carried out by one of two strategies. Targeting [`DEPLOYER_ADDRESS`] selects the
//! privileged deployment path; everything else is a generic call.

use alloy_primitives::{Address, Bytes};
use tracing::debug;

use crate::{constants::DEPLOYER_ADDRESS, AccountError, Call, CallHandler, Fault, OperationKind};

/// A way of carrying out a [`Call`] as `account`.
pub trait Execute {
    /// Performs the call through `host`.
    fn execute<H: CallHandler + ?Sized>(
        &self,
        host: &mut H,
        account: Address,
        call: &Call,
    ) -> Result<Bytes, Fault>;
}

/// A plain call to the target carrying value and payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericCall;

impl Execute for GenericCall {
    fn execute<H: CallHandler + ?Sized>(
        &self,
        host: &mut H,
        account: Address,
        call: &Call,
    ) -> Result<Bytes, Fault> {
        host.call(account, call.target, call.value, &call.payload)
    }
}

/// A privileged system call into the deployer, forwarding the computation budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployerCall {
    /// Budget handed to the deployer.
    pub budget: u64,
}

impl Execute for DeployerCall {
    fn execute<H: CallHandler + ?Sized>(
        &self,
        host: &mut H,
        account: Address,
        call: &Call,
    ) -> Result<Bytes, Fault> {
        host.deployer_call(account, call.value, &call.payload, self.budget)
    }
}

/// Performs `call` as `account`, choosing the strategy by target.
///
/// Deployment failures propagate the deployer's revert data verbatim as
/// [`AccountError::Revert`]. Generic failures become [`AccountError::ExecutionFailed`], keeping
/// the revert output only when `kind` carries it. A call without a target does nothing.
pub fn dispatch_call<H: CallHandler + ?Sized>(
    host: &mut H,
    account: Address,
    kind: OperationKind,
    call: &Call,
    budget: u64,
) -> Result<Bytes, AccountError> {
    if call.is_none() {
        debug!(target: "smart_account::execution", %account, "no call to execute");
        return Ok(Bytes::new());
    }

    if call.target == DEPLOYER_ADDRESS {
        debug!(target: "smart_account::execution", %account, value = %call.value, budget, "dispatching deployment");
        return DeployerCall { budget }
            .execute(host, account, call)
            .map_err(|fault| AccountError::Revert(fault.output));
    }

    debug!(target: "smart_account::execution", %account, target = %call.target, value = %call.value, "dispatching call");
    GenericCall.execute(host, account, call).map_err(|fault| AccountError::ExecutionFailed {
        target: call.target,
        output: kind.carries_failure_output().then_some(fault.output),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sim::{CallKind, InMemoryHost, Token},
        test_utils::ALICE,
        BalanceAuthority,
    };
    use alloy_primitives::{address, bytes, U256};

    const ACCOUNT: Address = address!("0x1000000000000000000000000000000000000001");

    #[test]
    fn test_generic_call_forwards_value() {
        let mut host = InMemoryHost::default().account_balance(ACCOUNT, U256::from(10));
        let call = Call::new(ALICE, U256::from(4), Bytes::new());

        dispatch_call(&mut host, ACCOUNT, OperationKind::Sequencer, &call, 0).unwrap();
        assert_eq!(host.balance(ALICE), U256::from(4));
        assert_eq!(host.trace()[0].kind, CallKind::Generic);
    }

    #[test]
    fn test_gateway_keeps_revert_output() {
        let token = address!("0x5000000000000000000000000000000000000005");
        let mut host = InMemoryHost::default().contract(token, Token::default());
        let call = Call::new(token, U256::ZERO, bytes!("deadbeef"));

        let Err(AccountError::ExecutionFailed { target, output }) =
            dispatch_call(&mut host, ACCOUNT, OperationKind::Gateway, &call, 0)
        else {
            panic!("expected execution failure");
        };
        assert_eq!(target, token);
        assert!(output.is_some_and(|output| !output.is_empty()));
    }

    #[test]
    fn test_sequencer_discards_revert_output() {
        let token = address!("0x5000000000000000000000000000000000000005");
        let mut host = InMemoryHost::default().contract(token, Token::default());
        let call = Call::new(token, U256::ZERO, bytes!("deadbeef"));

        assert_eq!(
            dispatch_call(&mut host, ACCOUNT, OperationKind::Sequencer, &call, 0),
            Err(AccountError::ExecutionFailed { target: token, output: None })
        );
    }

    #[test]
    fn test_deployer_target_takes_deployment_path() {
        let mut host =
            InMemoryHost::with_system_contracts().account_balance(ACCOUNT, U256::from(9));
        let call = Call::new(DEPLOYER_ADDRESS, U256::from(9), bytes!("01"));

        // Malformed deployment input: the deployer's revert data comes back untouched.
        let err = dispatch_call(&mut host, ACCOUNT, OperationKind::Gateway, &call, 77).unwrap_err();
        let AccountError::Revert(data) = err else { panic!("expected verbatim revert") };
        assert!(!data.is_empty());

        let record = &host.trace()[0];
        assert_eq!(record.kind, CallKind::Deployer);
        assert_eq!(record.budget, 77);
        assert_eq!(host.balance(ACCOUNT), U256::from(9));
    }

    #[test]
    fn test_empty_call_is_a_no_op() {
        let mut host = InMemoryHost::default();
        let call = Call::default();
        let out = dispatch_call(&mut host, ACCOUNT, OperationKind::Sequencer, &call, 0).unwrap();
        assert!(out.is_empty());
        assert!(host.trace().is_empty());
    }
}
