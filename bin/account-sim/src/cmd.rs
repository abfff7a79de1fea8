use clap::Parser;

use crate::common::{LogArgs, SimError};

/// Main command enumeration for the account-sim CLI tool
#[derive(Parser, Debug)]
#[command(infer_subcommands = true, version = "0.1")]
pub struct MainCmd {
    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the account-sim CLI tool
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Run a scenario file
    Run(crate::run::Cmd),
    /// Compute the hash and signing digest of an operation
    Digest(crate::digest::Cmd),
}

/// Error types for the main command system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Simulator error
    #[error("{0}")]
    Sim(#[from] SimError),
}

impl MainCmd {
    /// Execute the main command
    pub fn run(&self) -> Result<(), Error> {
        self.log_args.init()?;
        match &self.command {
            Command::Run(cmd) => cmd.run()?,
            Command::Digest(cmd) => cmd.run()?,
        }
        Ok(())
    }
}
