use alloy_primitives::Address;
use smart_account::sim::WorldError;

/// Error types for the account-sim commands
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Failed to load an input file
    #[error("Failed to load input file '{file}': {source}")]
    InputLoad {
        /// The file path that failed to load
        file: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse JSON content
    #[error("Failed to parse JSON from '{file}': {source}")]
    JsonParse {
        /// The file path where JSON parsing failed
        file: String,
        /// The underlying JSON parsing error
        source: serde_json::Error,
    },

    /// Failed to write an output file
    #[error("Failed to write output file '{file}': {source}")]
    OutputWrite {
        /// The file path that failed to write
        file: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to serialize output
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The scenario could not be set up
    #[error("Invalid scenario: {0}")]
    Setup(#[from] WorldError),

    /// A step names an account the scenario never deployed
    #[error("Step {index} targets unknown account {account}")]
    UnknownAccount {
        /// Position of the step
        index: usize,
        /// The missing account
        account: Address,
    },

    /// A step failed and `--strict` was given
    #[error("Step {index} failed: {reason}")]
    StepFailed {
        /// Position of the step
        index: usize,
        /// Why it failed
        reason: String,
    },
}

/// Result type for the account-sim commands
pub type Result<T> = std::result::Result<T, SimError>;
