//! Test utilities for smart accounts.

mod signer;
mod wire;

pub use signer::*;
pub use wire::*;

use alloy_primitives::{address, Address};

/// An address with no special role.
pub const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");

/// A second address with no special role.
pub const BOB: Address = address!("0x0000000000000000000000000000000000000b0b");
