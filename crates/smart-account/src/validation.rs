//! The validation engine shared by both submission models.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{recover_signer, AccountConfig, AccountError, Host, Operation, OperationKind};

/// Outcome of signature validation. A value returned to the dispatcher, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    /// Signed by the owner; carries the success marker of the operation's submission model.
    Accepted(B256),
    /// Not signed by the owner.
    Rejected,
}

impl ValidationResult {
    /// An acceptance carrying the success marker of `kind`.
    pub fn accepted(kind: OperationKind) -> Self {
        Self::Accepted(kind.success_marker())
    }

    /// Whether the operation was accepted.
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The word handed back to a dispatcher of `kind`. Dispatchers treat anything other than
    /// the success marker as failure.
    pub fn encode(&self, kind: OperationKind) -> B256 {
        match self {
            Self::Accepted(marker) => *marker,
            Self::Rejected => kind.rejection_marker(),
        }
    }
}

/// How the engine treats the operation's nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceCheck {
    /// Consume the nonce through the ledger's compare-and-increment.
    Consume,
    /// The nonce was consumed when this exact operation was accepted earlier; do not touch the
    /// ledger again.
    ///
    /// `settled_fee` is the amount already paid for the operation since it was accepted. It is
    /// credited against `required_balance`, so a fee is never charged twice.
    AlreadyConsumed { settled_fee: U256 },
}

/// Decides whether `op` may proceed on the account configured by `config`.
///
/// The steps run in a fixed order:
/// 1. consume the nonce (failure propagates);
/// 2. check `required_balance`, less any fee already settled, against the current balance,
///    after the nonce is burned;
/// 3. recover the signer from the configured digest of the operation hash;
/// 4. compare the signer with the owner.
///
/// A non-owner signature is returned as [`ValidationResult::Rejected`], not as an error.
pub fn validate_operation<H: Host + ?Sized>(
    config: &AccountConfig,
    host: &mut H,
    op: &Operation,
    nonce_check: NonceCheck,
) -> Result<ValidationResult, AccountError> {
    if op.sender != config.address {
        return Err(AccountError::SenderMismatch { sender: op.sender, account: config.address });
    }

    let settled_fee = match nonce_check {
        NonceCheck::Consume => {
            let expected = host.current_nonce(config.address);
            if !host.consume_if_equals(config.address, op.nonce) {
                return Err(AccountError::NonceMismatch {
                    account: config.address,
                    nonce: op.nonce,
                    expected,
                });
            }
            debug!(target: "smart_account::validation", account = %config.address, nonce = %op.nonce, "nonce consumed");
            U256::ZERO
        }
        NonceCheck::AlreadyConsumed { settled_fee } => {
            debug!(target: "smart_account::validation", account = %config.address, nonce = %op.nonce, %settled_fee, "revalidating accepted operation");
            settled_fee
        }
    };

    let required = op.required_balance().saturating_sub(settled_fee);
    let available = host.balance(config.address);
    if required > available {
        debug!(target: "smart_account::validation", %required, %available, "insufficient balance");
        return Err(AccountError::InsufficientBalance { required, available });
    }

    let digest = config.digest.apply(op.hash());
    let signer = recover_signer(digest, &op.signature);
    trace!(target: "smart_account::validation", %digest, ?signer, "recovered signer");

    if signer == Some(config.owner) {
        Ok(ValidationResult::accepted(op.kind))
    } else {
        debug!(target: "smart_account::validation", owner = %config.owner, ?signer, "signature rejected");
        Ok(ValidationResult::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sim::InMemoryHost,
        test_utils::{TestSigner, ALICE},
        BalanceAuthority, DigestScheme, NonceLedger,
    };
    use alloy_primitives::{address, Address, Bytes, U256};

    const ACCOUNT: Address = address!("0x1000000000000000000000000000000000000001");
    const DISPATCHER: Address = address!("0x3000000000000000000000000000000000000003");

    fn setup(balance: u64) -> (AccountConfig, TestSigner, InMemoryHost) {
        let owner = TestSigner::from_seed(1);
        let config = AccountConfig {
            address: ACCOUNT,
            owner: owner.address(),
            dispatcher: DISPATCHER,
            digest: DigestScheme::EthSignedMessage,
        };
        let host = InMemoryHost::default().account_balance(ACCOUNT, U256::from(balance));
        (config, owner, host)
    }

    fn operation(nonce: u64) -> Operation {
        Operation {
            kind: OperationKind::Sequencer,
            sender: ACCOUNT,
            nonce: U256::from(nonce),
            target: ALICE,
            value: U256::from(10),
            payload: Bytes::new(),
            signature: Bytes::new(),
            fee_limit: U256::from(5),
            fee_per_unit: U256::from(2),
        }
    }

    #[test]
    fn test_owner_signature_is_accepted() {
        let (config, owner, mut host) = setup(20);
        let op = owner.sign_operation(operation(0), config.digest);

        let result = validate_operation(&config, &mut host, &op, NonceCheck::Consume).unwrap();
        assert_eq!(result, ValidationResult::accepted(OperationKind::Sequencer));
        assert_eq!(host.current_nonce(ACCOUNT), U256::from(1));
    }

    #[test]
    fn test_foreign_signature_is_rejected_value() {
        let (config, _, mut host) = setup(20);
        let op = TestSigner::from_seed(2).sign_operation(operation(0), config.digest);

        let result = validate_operation(&config, &mut host, &op, NonceCheck::Consume).unwrap();
        assert_eq!(result, ValidationResult::Rejected);
        assert_eq!(host.current_nonce(ACCOUNT), U256::from(1));
    }

    #[test]
    fn test_wrong_digest_scheme_is_rejected() {
        let (config, owner, mut host) = setup(20);
        let op = owner.sign_operation(operation(0), DigestScheme::Raw);

        let result = validate_operation(&config, &mut host, &op, NonceCheck::Consume).unwrap();
        assert_eq!(result, ValidationResult::Rejected);
    }

    #[test]
    fn test_insufficient_balance_still_burns_nonce() {
        let (config, owner, mut host) = setup(19);
        let op = owner.sign_operation(operation(0), config.digest);

        assert_eq!(
            validate_operation(&config, &mut host, &op, NonceCheck::Consume),
            Err(AccountError::InsufficientBalance {
                required: U256::from(20),
                available: U256::from(19)
            })
        );
        assert_eq!(host.current_nonce(ACCOUNT), U256::from(1));

        // The old nonce can never be used again, even once funded.
        host.set_account_balance(ACCOUNT, U256::from(100));
        assert!(matches!(
            validate_operation(&config, &mut host, &op, NonceCheck::Consume),
            Err(AccountError::NonceMismatch { .. })
        ));
    }

    #[test]
    fn test_nonce_mismatch_changes_nothing() {
        let (config, owner, mut host) = setup(20);
        let op = owner.sign_operation(operation(1), config.digest);

        assert_eq!(
            validate_operation(&config, &mut host, &op, NonceCheck::Consume),
            Err(AccountError::NonceMismatch {
                account: ACCOUNT,
                nonce: U256::from(1),
                expected: U256::ZERO
            })
        );
        assert_eq!(host.current_nonce(ACCOUNT), U256::ZERO);
        assert_eq!(host.balance(ACCOUNT), U256::from(20));
    }

    #[test]
    fn test_already_consumed_skips_ledger() {
        let (config, owner, mut host) = setup(20);
        let op = owner.sign_operation(operation(0), config.digest);

        let check = NonceCheck::AlreadyConsumed { settled_fee: U256::ZERO };
        let result = validate_operation(&config, &mut host, &op, check).unwrap();
        assert!(result.is_accepted());
        assert_eq!(host.current_nonce(ACCOUNT), U256::ZERO);
    }

    /// A fee settled after acceptance counts toward the balance requirement.
    #[test]
    fn test_settled_fee_is_credited() {
        // value 10 with the fee of 10 already pulled.
        let (config, owner, mut host) = setup(10);
        let op = owner.sign_operation(operation(0), config.digest);

        let check = NonceCheck::AlreadyConsumed { settled_fee: U256::from(10) };
        let result = validate_operation(&config, &mut host, &op, check).unwrap();
        assert!(result.is_accepted());

        // A partial credit still leaves the remainder to cover.
        let check = NonceCheck::AlreadyConsumed { settled_fee: U256::from(4) };
        assert_eq!(
            validate_operation(&config, &mut host, &op, check),
            Err(AccountError::InsufficientBalance {
                required: U256::from(16),
                available: U256::from(10)
            })
        );
    }

    #[test]
    fn test_foreign_sender_fails_before_nonce() {
        let (config, owner, mut host) = setup(20);
        let mut op = operation(0);
        op.sender = ALICE;
        let op = owner.sign_operation(op, config.digest);

        assert_eq!(
            validate_operation(&config, &mut host, &op, NonceCheck::Consume),
            Err(AccountError::SenderMismatch { sender: ALICE, account: ACCOUNT })
        );
        assert_eq!(host.current_nonce(ACCOUNT), U256::ZERO);
    }

    #[test]
    fn test_encode_rejected_uses_sentinel() {
        assert_eq!(ValidationResult::Rejected.encode(OperationKind::Sequencer), B256::ZERO);
        assert_eq!(
            ValidationResult::Rejected.encode(OperationKind::Gateway),
            B256::with_last_byte(1)
        );
    }
}
