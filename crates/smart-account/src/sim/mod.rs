//! An in-memory host for running accounts outside a chain.
//!
//! [`InMemoryHost`] plays the nonce ledger, the balance authority and the call layer, with a
//! small set of in-memory contracts as call targets. [`World`] owns the host together with the
//! accounts and routes entry-point requests to them. Every request takes `&mut World`, so calls
//! against an account are serialized exactly as a chain would serialize them.

mod contracts;
mod host;
mod ledger;
mod world;

pub use contracts::*;
pub use host::*;
pub use ledger::*;
pub use world::*;
