//! Well-known identities and validation markers.

use alloy_primitives::{address, Address};

pub use account_abi::{
    gateway::{SIG_VALIDATION_FAILED, SIG_VALIDATION_SUCCESS},
    sequencer::ACCOUNT_VALIDATION_SUCCESS_MAGIC,
};

/// The deployer system contract. Calls targeting it go through the privileged deployment path
/// instead of a generic call. Recognized globally, not per account.
pub const DEPLOYER_ADDRESS: Address = address!("0x0000000000000000000000000000000000008006");

/// The bootloader system process, the usual dispatcher of Sequencer-model accounts.
pub const BOOTLOADER_ADDRESS: Address = address!("0x0000000000000000000000000000000000008001");

/// Length of an `r ‖ s ‖ v` ECDSA signature.
pub const SIGNATURE_LENGTH: usize = 65;
