//! `account-sim`: runs smart-account scenarios against an in-memory host.
//!
//! A scenario deploys Gateway and Sequencer accounts, registers in-memory contracts and submits
//! a list of entry-point calls. Every step's outcome and the final host state are printed as
//! JSON.

use clap::Parser;

mod cmd;
pub use cmd::*;

mod common;
mod digest;
mod run;

fn main() -> Result<(), Error> {
    set_thread_panic_hook();
    MainCmd::parse().run().inspect_err(|e| println!("{e}"))
}

/// Sets thread panic hook, useful for having tests that panic.
fn set_thread_panic_hook() {
    use std::{
        backtrace::Backtrace,
        panic::{set_hook, take_hook},
        process::exit,
    };
    let orig_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
        println!("Custom backtrace: {}", Backtrace::capture());
        orig_hook(panic_info);
        exit(1);
    }));
}
