//! Digest module for computing what an owner must sign

mod cmd;

pub use cmd::*;
