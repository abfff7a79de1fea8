//! Run module for executing scenario files
//!
//! A scenario deploys accounts on an in-memory host and submits entry-point calls to them in
//! order. Step failures are part of the report, not fatal, unless `--strict` is given.

mod cmd;
mod scenario;

pub use cmd::*;
pub use scenario::*;
