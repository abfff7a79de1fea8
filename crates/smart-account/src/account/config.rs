use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::DigestScheme;

/// Identities and digest scheme of an account, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountConfig {
    /// The account's own address.
    pub address: Address,
    /// The owner whose signature authorizes operations.
    pub owner: Address,
    /// The trusted dispatcher: the entry point (Gateway) or bootloader (Sequencer).
    pub dispatcher: Address,
    /// The transform applied to operation hashes before signer recovery.
    pub digest: DigestScheme,
}
