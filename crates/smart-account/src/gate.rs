//! Caller restrictions declared by each entry point.

use alloy_primitives::Address;

use crate::{AccountConfig, AccountError};

/// The caller predicate an entry point declares. Checked before any state mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerGate {
    /// Anyone may call.
    Open,
    /// Only the account's trusted dispatcher may call.
    OnlyDispatcher,
    /// The dispatcher or the account's owner may call.
    DispatcherOrOwner,
}

impl CallerGate {
    /// Whether `caller` satisfies the gate for an account configured with `config`.
    pub fn permits(self, caller: Address, config: &AccountConfig) -> bool {
        match self {
            Self::Open => true,
            Self::OnlyDispatcher => caller == config.dispatcher,
            Self::DispatcherOrOwner => caller == config.dispatcher || caller == config.owner,
        }
    }

    /// Fails with [`AccountError::UnauthorizedCaller`] unless `caller` satisfies the gate.
    pub fn check(
        self,
        caller: Address,
        config: &AccountConfig,
        entry_point: &'static str,
    ) -> Result<(), AccountError> {
        if self.permits(caller, config) {
            Ok(())
        } else {
            Err(AccountError::UnauthorizedCaller { caller, entry_point })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DigestScheme;
    use alloy_primitives::address;
    use rstest::rstest;

    const ACCOUNT: Address = address!("0x1000000000000000000000000000000000000001");
    const OWNER: Address = address!("0x2000000000000000000000000000000000000002");
    const DISPATCHER: Address = address!("0x3000000000000000000000000000000000000003");
    const STRANGER: Address = address!("0x4000000000000000000000000000000000000004");

    fn config() -> AccountConfig {
        AccountConfig {
            address: ACCOUNT,
            owner: OWNER,
            dispatcher: DISPATCHER,
            digest: DigestScheme::Raw,
        }
    }

    #[rstest]
    #[case(CallerGate::Open, STRANGER, true)]
    #[case(CallerGate::OnlyDispatcher, DISPATCHER, true)]
    #[case(CallerGate::OnlyDispatcher, OWNER, false)]
    #[case(CallerGate::OnlyDispatcher, STRANGER, false)]
    #[case(CallerGate::DispatcherOrOwner, DISPATCHER, true)]
    #[case(CallerGate::DispatcherOrOwner, OWNER, true)]
    #[case(CallerGate::DispatcherOrOwner, STRANGER, false)]
    #[case(CallerGate::DispatcherOrOwner, ACCOUNT, false)]
    fn test_gate(#[case] gate: CallerGate, #[case] caller: Address, #[case] permitted: bool) {
        assert_eq!(gate.permits(caller, &config()), permitted);
        assert_eq!(gate.check(caller, &config(), "entry").is_ok(), permitted);
    }

    #[test]
    fn test_violation_names_caller_and_entry_point() {
        assert_eq!(
            CallerGate::OnlyDispatcher.check(OWNER, &config(), "validate"),
            Err(AccountError::UnauthorizedCaller { caller: OWNER, entry_point: "validate" })
        );
    }
}
