//! Scenario file types

use std::collections::BTreeMap;

use account_abi::{gateway::PackedUserOperation, sequencer::Transaction};
use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use smart_account::{
    sim::{CallRecord, Request, Response},
    test_utils::{sequencer_transaction, user_operation, Fees},
    AccountConfig, Call, ContextHashes, OperationKind,
};

/// A scenario: initial state plus the steps to run against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Accounts to deploy
    #[serde(default)]
    pub accounts: Vec<AccountSpec>,
    /// In-memory contracts to register
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
    /// Native balances of plain addresses
    #[serde(default)]
    pub balances: Vec<BalanceSpec>,
    /// Entry-point calls, run in order
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// An account to deploy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSpec {
    /// Submission model of the account
    pub kind: OperationKind,
    /// Identities and digest scheme
    #[serde(flatten)]
    pub config: AccountConfig,
    /// Initial native balance
    #[serde(default)]
    pub balance: U256,
    /// Initial nonce
    #[serde(default)]
    pub nonce: U256,
}

/// Contracts the simulator knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractType {
    /// A token minting to its caller
    Token,
}

/// A contract to register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContractSpec {
    /// Where the contract lives
    pub address: Address,
    /// What the contract is
    #[serde(rename = "type")]
    pub contract: ContractType,
}

/// A native balance to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BalanceSpec {
    /// The holder
    pub address: Address,
    /// The balance
    pub amount: U256,
}

/// Hashes the dispatcher passes alongside the operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSpec {
    /// `userOpHash` / `txHash`
    #[serde(default)]
    pub primary: B256,
    /// The hash the dispatcher suggests was signed
    #[serde(default)]
    pub suggested: B256,
}

impl From<ContextSpec> for ContextHashes {
    fn from(spec: ContextSpec) -> Self {
        Self::new(spec.primary, spec.suggested)
    }
}

/// Model-independent description of an operation. Converted to the wire record of the target
/// account's submission model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationSpec {
    /// Sender, defaults to the step's account
    pub sender: Option<Address>,
    /// Replay counter
    pub nonce: u64,
    /// Call destination, zero for none
    pub target: Address,
    /// Native asset to forward
    pub value: U256,
    /// Calldata
    pub payload: Bytes,
    /// Fee units the operation may use
    pub fee_limit: u64,
    /// Price per fee unit
    pub fee_per_unit: u64,
    /// Raw `r ‖ s ‖ v` signature
    pub signature: Bytes,
}

impl OperationSpec {
    /// The call the operation requests.
    pub fn call(&self) -> Call {
        Call::new(self.target, self.value, self.payload.clone())
    }

    const fn fees(&self) -> Fees {
        Fees { limit: self.fee_limit, per_unit: self.fee_per_unit }
    }
}

/// What a step asks of the account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Dispatcher validation
    Validate {
        /// The operation
        operation: OperationSpec,
        /// Dispatcher hashes
        #[serde(default)]
        context: ContextSpec,
        /// Prefund requested by a Gateway entry point
        #[serde(default)]
        missing_account_funds: U256,
    },
    /// Execution through the dispatcher-or-owner entry point
    Execute {
        /// The operation
        operation: OperationSpec,
        /// Dispatcher hashes
        #[serde(default)]
        context: ContextSpec,
    },
    /// Execution through the open entry point
    ExecuteUnescorted {
        /// The operation
        operation: OperationSpec,
    },
    /// Pull-style fee payment
    PayFee {
        /// The operation
        operation: OperationSpec,
        /// Dispatcher hashes
        #[serde(default)]
        context: ContextSpec,
    },
    /// Fee-sponsor preparation
    PrepareFeeSponsor,
}

/// One entry-point call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Step {
    /// Who calls
    pub caller: Address,
    /// The account called
    pub account: Address,
    /// What is asked
    pub action: Action,
}

impl Step {
    /// The request this step makes of an account of `kind`.
    pub fn request(&self, kind: OperationKind) -> Request {
        match (&self.action, kind) {
            (
                Action::Validate { operation, context, missing_account_funds },
                OperationKind::Gateway,
            ) => Request::ValidateUserOp {
                user_op: self.user_op(operation),
                context: (*context).into(),
                missing_account_funds: *missing_account_funds,
            },
            (Action::Validate { operation, context, .. }, OperationKind::Sequencer) => {
                Request::ValidateTransaction {
                    context: (*context).into(),
                    transaction: self.transaction(operation),
                }
            }
            (Action::Execute { operation, .. }, OperationKind::Gateway) => {
                Request::Execute { call: operation.call() }
            }
            (Action::Execute { operation, context }, OperationKind::Sequencer) => {
                Request::ExecuteTransaction {
                    context: (*context).into(),
                    transaction: self.transaction(operation),
                }
            }
            (Action::ExecuteUnescorted { operation }, OperationKind::Gateway) => {
                Request::ExecuteUnescorted { user_op: self.user_op(operation) }
            }
            (Action::ExecuteUnescorted { operation }, OperationKind::Sequencer) => {
                Request::ExecuteTransactionFromOutside { transaction: self.transaction(operation) }
            }
            (Action::PayFee { operation, context }, _) => Request::PayForTransaction {
                context: (*context).into(),
                transaction: self.transaction(operation),
            },
            (Action::PrepareFeeSponsor, _) => Request::PrepareFeeSponsor,
        }
    }

    fn sender(&self, operation: &OperationSpec) -> Address {
        operation.sender.unwrap_or(self.account)
    }

    fn user_op(&self, operation: &OperationSpec) -> PackedUserOperation {
        let mut user_op = user_operation(
            self.sender(operation),
            operation.nonce,
            &operation.call(),
            operation.fees(),
        );
        user_op.signature = operation.signature.clone();
        user_op
    }

    fn transaction(&self, operation: &OperationSpec) -> Transaction {
        let mut transaction = sequencer_transaction(
            self.sender(operation),
            operation.nonce,
            &operation.call(),
            operation.fees(),
        );
        transaction.signature = operation.signature.clone();
        transaction
    }
}

/// Outcome of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StepOutcome {
    /// The entry point returned
    Ok {
        /// What it returned
        response: Response,
    },
    /// The entry point failed
    Failed {
        /// Why
        error: String,
    },
}

/// Report line for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    /// Position in the scenario
    pub index: usize,
    /// Who called
    pub caller: Address,
    /// The account called
    pub account: Address,
    /// Entry point invoked
    pub entry_point: &'static str,
    /// What happened
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Final state of a deployed account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReport {
    /// The account
    pub address: Address,
    /// Its submission model
    pub kind: OperationKind,
    /// Next nonce
    pub nonce: U256,
    /// Native balance
    pub balance: U256,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Per-step outcomes
    pub steps: Vec<StepReport>,
    /// Final account state
    pub accounts: Vec<AccountReport>,
    /// Final native balances of every other address the scenario names
    pub balances: BTreeMap<Address, U256>,
    /// Calls the host performed, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<CallRecord>>,
}
