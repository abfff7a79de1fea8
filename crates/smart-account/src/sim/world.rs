use account_abi::{gateway::PackedUserOperation, sequencer::Transaction};
use alloy_primitives::{map::HashMap, Address, Bytes, B256, U256};
use serde::Serialize;
use tracing::info;

use crate::{
    AccountConfig, AccountError, BalanceAuthority, Call, ContextHashes, OperationKind,
    SmartAccount, ValidationResult,
};

use super::InMemoryHost;

/// An entry-point call addressed to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Gateway: validate a user operation and push the missing funds.
    ValidateUserOp {
        /// The operation.
        user_op: PackedUserOperation,
        /// Hashes passed by the entry point.
        context: ContextHashes,
        /// Prefund the entry point asks for.
        missing_account_funds: U256,
    },
    /// Gateway: execute a call without validation.
    Execute {
        /// The call.
        call: Call,
    },
    /// Gateway: validate and execute a user operation submitted by anyone.
    ExecuteUnescorted {
        /// The operation.
        user_op: PackedUserOperation,
    },
    /// Sequencer: validate a transaction.
    ValidateTransaction {
        /// Hashes passed by the bootloader.
        context: ContextHashes,
        /// The transaction.
        transaction: Transaction,
    },
    /// Sequencer: pay the transaction's fee to the bootloader.
    PayForTransaction {
        /// Hashes passed by the bootloader.
        context: ContextHashes,
        /// The transaction.
        transaction: Transaction,
    },
    /// Sequencer: revalidate and execute a transaction.
    ExecuteTransaction {
        /// Hashes passed by the bootloader.
        context: ContextHashes,
        /// The transaction.
        transaction: Transaction,
    },
    /// Sequencer: validate and execute a transaction submitted by anyone.
    ExecuteTransactionFromOutside {
        /// The transaction.
        transaction: Transaction,
    },
    /// Either model: fee-sponsor preparation.
    PrepareFeeSponsor,
}

impl Request {
    /// Name of the entry point the request targets.
    pub const fn entry_point(&self) -> &'static str {
        match self {
            Self::ValidateUserOp { .. } => "validateUserOp",
            Self::Execute { .. } => "execute",
            Self::ExecuteUnescorted { .. } => "executeUnescorted",
            Self::ValidateTransaction { .. } => "validateTransaction",
            Self::PayForTransaction { .. } => "payForTransaction",
            Self::ExecuteTransaction { .. } => "executeTransaction",
            Self::ExecuteTransactionFromOutside { .. } => "executeTransactionFromOutside",
            Self::PrepareFeeSponsor => "prepareFeeSponsor",
        }
    }
}

/// The successful result of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    /// Validation finished with a result.
    Validation {
        /// The result.
        result: ValidationResult,
        /// The word returned to the dispatcher.
        marker: B256,
    },
    /// A call was executed.
    Executed {
        /// Output of the call, empty where the model discards it.
        output: Bytes,
    },
    /// A fee was paid to the dispatcher.
    FeePaid {
        /// The amount paid.
        amount: U256,
    },
}

/// Errors of the simulated world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// No account lives at the address.
    #[error("no account at {0}")]
    UnknownAccount(Address),
    /// An account already lives at the address.
    #[error("an account already exists at {0}")]
    AccountExists(Address),
    /// The account's submission model has no such entry point.
    #[error("`{entry_point}` is not an entry point of {kind} accounts")]
    UnsupportedEntryPoint {
        /// The requested entry point.
        entry_point: &'static str,
        /// The account's model.
        kind: OperationKind,
    },
    /// The entry point failed.
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Accounts plus the host they run on.
#[derive(Debug, Default)]
pub struct World {
    host: InMemoryHost,
    accounts: HashMap<Address, SmartAccount>,
}

impl World {
    /// Creates a world on top of `host`.
    pub fn new(host: InMemoryHost) -> Self {
        Self { host, accounts: HashMap::default() }
    }

    /// The host.
    pub const fn host(&self) -> &InMemoryHost {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut InMemoryHost {
        &mut self.host
    }

    /// The account at `address`.
    pub fn account(&self, address: Address) -> Option<&SmartAccount> {
        self.accounts.get(&address)
    }

    /// Deploys an account of `kind` at `config.address`.
    pub fn deploy_account(
        &mut self,
        kind: OperationKind,
        config: AccountConfig,
    ) -> Result<Address, WorldError> {
        let address = config.address;
        if self.accounts.contains_key(&address) {
            return Err(WorldError::AccountExists(address));
        }
        info!(target: "smart_account::sim", %address, %kind, owner = %config.owner, dispatcher = %config.dispatcher, "account deployed");
        self.accounts.insert(address, SmartAccount::new(kind, config));
        Ok(address)
    }

    /// Credits `amount` to `to` out of thin air.
    pub fn fund(&mut self, to: Address, amount: U256) {
        let balance = self.host.balance(to).saturating_add(amount);
        self.host.set_account_balance(to, balance);
    }

    /// Invokes an entry point of the account at `account` as `caller`.
    pub fn submit(
        &mut self,
        caller: Address,
        account: Address,
        request: Request,
    ) -> Result<Response, WorldError> {
        let entry_point = request.entry_point();
        let smart_account =
            self.accounts.get_mut(&account).ok_or(WorldError::UnknownAccount(account))?;
        let kind = smart_account.kind();
        let host = &mut self.host;

        let response = match (smart_account, request) {
            (
                SmartAccount::Gateway(gateway),
                Request::ValidateUserOp { user_op, context, missing_account_funds },
            ) => {
                let result = gateway.validate_user_op(
                    host,
                    caller,
                    &user_op,
                    context,
                    missing_account_funds,
                )?;
                Response::Validation { result, marker: result.encode(kind) }
            }
            (SmartAccount::Gateway(gateway), Request::Execute { call }) => {
                Response::Executed { output: gateway.execute(host, caller, &call)? }
            }
            (SmartAccount::Gateway(gateway), Request::ExecuteUnescorted { user_op }) => {
                Response::Executed { output: gateway.execute_unescorted(host, &user_op)? }
            }
            (SmartAccount::Gateway(gateway), Request::PrepareFeeSponsor) => {
                gateway.prepare_fee_sponsor()?;
                Response::Executed { output: Bytes::new() }
            }
            (
                SmartAccount::Sequencer(sequencer),
                Request::ValidateTransaction { context, transaction },
            ) => {
                let result = sequencer.validate_transaction(host, caller, context, &transaction)?;
                Response::Validation { result, marker: result.encode(kind) }
            }
            (
                SmartAccount::Sequencer(sequencer),
                Request::PayForTransaction { context, transaction },
            ) => Response::FeePaid {
                amount: sequencer.pay_for_transaction(host, context, &transaction)?,
            },
            (
                SmartAccount::Sequencer(sequencer),
                Request::ExecuteTransaction { context, transaction },
            ) => {
                sequencer.execute_transaction(host, caller, context, &transaction)?;
                Response::Executed { output: Bytes::new() }
            }
            (
                SmartAccount::Sequencer(sequencer),
                Request::ExecuteTransactionFromOutside { transaction },
            ) => {
                sequencer.execute_transaction_from_outside(host, &transaction)?;
                Response::Executed { output: Bytes::new() }
            }
            (SmartAccount::Sequencer(sequencer), Request::PrepareFeeSponsor) => {
                sequencer.prepare_for_paymaster()?;
                Response::Executed { output: Bytes::new() }
            }
            _ => return Err(WorldError::UnsupportedEntryPoint { entry_point, kind }),
        };

        info!(target: "smart_account::sim", %caller, %account, entry_point, "entry point succeeded");
        Ok(response)
    }
}
