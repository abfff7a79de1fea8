//! Validation and execution protocol of a smart account.
//!
//! An account authorizes and runs operations on behalf of its owner under two submission
//! models: the Gateway model, where an entry point forwards a user operation, and the Sequencer
//! model, where a bootloader process drives validation, fee payment and execution as separate
//! calls. Both models share one validation engine: the nonce is consumed first, then the balance
//! is checked, then the owner's signature is verified.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod account;
pub use account::*;

mod error;
pub use error::*;

mod execution;
pub use execution::*;

mod gate;
pub use gate::*;

mod host;
pub use host::*;

mod normalize;
pub use normalize::*;

mod operation;
pub use operation::*;

mod settlement;
pub use settlement::*;

mod signature;
pub use signature::*;

pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

mod validation;
pub use validation::*;
