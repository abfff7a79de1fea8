use std::path::PathBuf;

use alloy_primitives::{Address, Bytes, B256, U256};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use smart_account::{DigestScheme, Operation, OperationKind};

use crate::common::{emit_json, Result};

/// Submission model of the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Gateway-submitted user operation
    Gateway,
    /// Sequencer transaction
    Sequencer,
}

impl From<KindArg> for OperationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Gateway => Self::Gateway,
            KindArg::Sequencer => Self::Sequencer,
        }
    }
}

/// Transform from operation hash to signing digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    /// Sign the operation hash itself
    Raw,
    /// Sign the EIP-191 signed-message wrapper of the hash
    EthSignedMessage,
}

impl From<SchemeArg> for DigestScheme {
    fn from(scheme: SchemeArg) -> Self {
        match scheme {
            SchemeArg::Raw => Self::Raw,
            SchemeArg::EthSignedMessage => Self::EthSignedMessage,
        }
    }
}

/// Compute the hash and signing digest of an operation
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Submission model
    #[arg(long = "kind", value_enum)]
    pub kind: KindArg,

    /// Digest scheme the account is configured with
    #[arg(long = "scheme", value_enum)]
    pub scheme: SchemeArg,

    /// The account the operation runs as
    #[arg(long = "sender", visible_aliases = ["from"])]
    pub sender: Address,

    /// Replay counter
    #[arg(long = "nonce", default_value = "0")]
    pub nonce: U256,

    /// Call destination
    #[arg(
        long = "target",
        visible_aliases = ["to"],
        default_value = "0x0000000000000000000000000000000000000000"
    )]
    pub target: Address,

    /// Native asset to forward
    #[arg(long = "value", default_value = "0")]
    pub value: U256,

    /// Calldata (hex string)
    #[arg(long = "payload", visible_aliases = ["input"], default_value = "0x")]
    pub payload: Bytes,

    /// Fee units the operation may use
    #[arg(long = "fee-limit", default_value = "0")]
    pub fee_limit: U256,

    /// Price per fee unit
    #[arg(long = "fee-per-unit", default_value = "0")]
    pub fee_per_unit: U256,

    /// Output file (if not specified, prints to console)
    #[arg(long = "output", short = 'o')]
    pub output: Option<PathBuf>,
}

/// Hash and digest of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestReport {
    /// Hash of the operation's semantic fields
    pub hash: B256,
    /// What the owner signs
    pub digest: B256,
}

impl Cmd {
    /// Execute the digest command
    pub fn run(&self) -> Result<()> {
        emit_json(&self.report(), self.output.as_deref())
    }

    /// The operation described by the arguments, unsigned.
    pub fn operation(&self) -> Operation {
        Operation {
            kind: self.kind.into(),
            sender: self.sender,
            nonce: self.nonce,
            target: self.target,
            value: self.value,
            payload: self.payload.clone(),
            signature: Bytes::new(),
            fee_limit: self.fee_limit,
            fee_per_unit: self.fee_per_unit,
        }
    }

    /// Hash and digest of the operation.
    pub fn report(&self) -> DigestReport {
        let hash = self.operation().hash();
        DigestReport { hash, digest: DigestScheme::from(self.scheme).apply(hash) }
    }
}
