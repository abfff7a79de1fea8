//! Accounts of the two submission models.
//!
//! Both account types are thin state machines over the shared pieces: the
//! [`CallerGate`](crate::CallerGate) runs first, the wire record is normalized, the validation
//! engine decides, [`Settlement`](crate::Settlement) pays the dispatcher and
//! [`dispatch_call`](crate::dispatch_call) executes.

mod config;
mod gateway;
mod sequencer;

pub use config::*;
pub use gateway::*;
pub use sequencer::*;

use crate::OperationKind;

/// An account of either submission model.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum SmartAccount {
    /// A Gateway-model account.
    Gateway(GatewayAccount),
    /// A Sequencer-model account.
    Sequencer(SequencerAccount),
}

impl SmartAccount {
    /// Creates an account of `kind` from `config`.
    pub fn new(kind: OperationKind, config: AccountConfig) -> Self {
        match kind {
            OperationKind::Gateway => Self::Gateway(GatewayAccount::new(config)),
            OperationKind::Sequencer => Self::Sequencer(SequencerAccount::new(config)),
        }
    }

    /// The account's immutable configuration.
    pub const fn config(&self) -> &AccountConfig {
        match self {
            Self::Gateway(account) => account.config(),
            Self::Sequencer(account) => account.config(),
        }
    }

    /// The submission model the account serves.
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Gateway(_) => OperationKind::Gateway,
            Self::Sequencer(_) => OperationKind::Sequencer,
        }
    }
}
