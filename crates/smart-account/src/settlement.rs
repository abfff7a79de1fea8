//! Fee settlement: paying the dispatcher from the account's balance.

use alloy_primitives::U256;
use tracing::{debug, warn};

use crate::{AccountConfig, AccountError, BalanceAuthority, Operation};

/// How the dispatcher gets paid. Selected by submission model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Gateway model: at the end of validation the account pushes the missing funds the
    /// entry point asked for. A failed transfer is ignored; the entry point re-derives what it
    /// actually received.
    Push {
        /// The amount the entry point reports as missing.
        missing_funds: U256,
    },
    /// Sequencer model: the bootloader pulls `fee_limit * fee_per_unit` through a dedicated
    /// entry point. A failed transfer aborts with [`AccountError::FeeSettlementFailed`].
    Pull,
}

impl Settlement {
    /// Pays the account's dispatcher and returns the amount actually transferred.
    pub fn settle<H: BalanceAuthority + ?Sized>(
        self,
        config: &AccountConfig,
        host: &mut H,
        op: &Operation,
    ) -> Result<U256, AccountError> {
        match self {
            Self::Push { missing_funds } => {
                if missing_funds.is_zero() {
                    return Ok(U256::ZERO);
                }
                if host.transfer(config.address, config.dispatcher, missing_funds) {
                    debug!(target: "smart_account::settlement", dispatcher = %config.dispatcher, amount = %missing_funds, "prefund pushed");
                    Ok(missing_funds)
                } else {
                    warn!(target: "smart_account::settlement", dispatcher = %config.dispatcher, amount = %missing_funds, "prefund transfer failed, continuing");
                    Ok(U256::ZERO)
                }
            }
            Self::Pull => {
                let amount = op.max_fee();
                if !host.transfer(config.address, config.dispatcher, amount) {
                    return Err(AccountError::FeeSettlementFailed {
                        recipient: config.dispatcher,
                        amount,
                    });
                }
                debug!(target: "smart_account::settlement", dispatcher = %config.dispatcher, %amount, "fee paid");
                Ok(amount)
            }
        }
    }
}
