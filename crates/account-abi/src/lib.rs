//! ABI bindings for the smart account protocol.
//!
//! Every wire shape the account touches is declared here once: the Gateway packed user
//! operation and account `execute` call, the Sequencer transaction record, the account entry
//! points of both submission models, the deployer's `create` call and the mintable token used by
//! the simulator.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]
#![deny(unused_must_use)]

pub use alloy_primitives;
pub use alloy_sol_types;

/// Bindings for the Gateway-submitted model (relay → entry point → account).
pub mod gateway {
    alloy_sol_types::sol! {
        /// A user operation as forwarded by the entry point. Gas limits and fees are packed as
        /// two 128-bit halves: `accountGasLimits = verificationGasLimit ‖ callGasLimit`,
        /// `gasFees = maxPriorityFeePerGas ‖ maxFeePerGas`.
        #[derive(Debug, PartialEq, Eq)]
        struct PackedUserOperation {
            address sender;
            uint256 nonce;
            bytes initCode;
            bytes callData;
            bytes32 accountGasLimits;
            uint256 preVerificationGas;
            bytes32 gasFees;
            bytes paymasterAndData;
            bytes signature;
        }

        /// Entry points of a Gateway-model account.
        interface IGatewayAccount {
            /// Thrown when the caller is neither the entry point nor the owner.
            error NotFromEntryPointOrOwner();
            /// Thrown when the account call reverted.
            error CallFailed(bytes result);

            function validateUserOp(
                PackedUserOperation calldata userOp,
                bytes32 userOpHash,
                uint256 missingAccountFunds
            ) external returns (uint256 validationData);

            function execute(address dest, uint256 value, bytes calldata functionData) external;
        }
    }

    /// Validation data returned for an operation signed by the owner.
    pub const SIG_VALIDATION_SUCCESS: u64 = 0;

    /// Validation data returned for an operation not signed by the owner.
    pub const SIG_VALIDATION_FAILED: u64 = 1;
}

/// Bindings for the Sequencer-bootloader model (system process → account).
pub mod sequencer {
    alloy_sol_types::sol! {
        /// The transaction record handed to the account by the bootloader.
        #[derive(Debug, PartialEq, Eq)]
        struct Transaction {
            uint256 txType;
            uint256 from;
            uint256 to;
            uint256 gasLimit;
            uint256 gasPerPubdataByteLimit;
            uint256 maxFeePerGas;
            uint256 maxPriorityFeePerGas;
            uint256 paymaster;
            uint256 nonce;
            uint256 value;
            uint256[4] reserved;
            bytes data;
            bytes signature;
            bytes32[] factoryDeps;
            bytes paymasterInput;
            bytes reservedDynamic;
        }

        /// Entry points of a Sequencer-model account.
        interface ISequencerAccount {
            function validateTransaction(
                bytes32 _txHash,
                bytes32 _suggestedSignedHash,
                Transaction calldata _transaction
            ) external payable returns (bytes4 magic);

            function executeTransaction(
                bytes32 _txHash,
                bytes32 _suggestedSignedHash,
                Transaction calldata _transaction
            ) external payable;

            function executeTransactionFromOutside(Transaction calldata _transaction)
                external
                payable;

            function payForTransaction(
                bytes32 _txHash,
                bytes32 _suggestedSignedHash,
                Transaction calldata _transaction
            ) external payable;

            function prepareForPaymaster(
                bytes32 _txHash,
                bytes32 _possibleSignedHash,
                Transaction calldata _transaction
            ) external payable;
        }
    }

    /// The marker a Sequencer-model account returns for an accepted transaction: the selector of
    /// `validateTransaction`.
    pub const ACCOUNT_VALIDATION_SUCCESS_MAGIC: [u8; 4] =
        <ISequencerAccount::validateTransactionCall as alloy_sol_types::SolCall>::SELECTOR;
}

/// Bindings for the privileged deployer system contract.
pub mod deployer {
    alloy_sol_types::sol! {
        /// The deployer system contract.
        interface IContractDeployer {
            /// Thrown when the input is not a `create` call.
            error MalformedDeployment();
            /// Thrown when the derived address already holds a contract.
            error AddressAlreadyDeployed(address deployed);

            function create(
                bytes32 _salt,
                bytes32 _bytecodeHash,
                bytes calldata _input
            ) external payable returns (address);
        }
    }
}

/// Bindings for the mintable token the simulator registers as a call target.
pub mod token {
    alloy_sol_types::sol! {
        /// A token anyone can mint to themselves.
        interface IMintableToken {
            /// Thrown for calldata that matches no function.
            error UnknownSelector(bytes4 selector);

            function mint(uint256 amount) external;

            function balanceOf(address owner) external view returns (uint256);
        }
    }
}

/// The semantic fields an operation's signing digest commits to.
pub mod digest {
    alloy_sol_types::sol! {
        /// ABI layout of the canonical operation digest preimage. Signature bytes and every
        /// encoding artifact of the wire records are excluded.
        #[derive(Debug, PartialEq, Eq)]
        struct CanonicalOperation {
            uint8 kind;
            address sender;
            uint256 nonce;
            address target;
            uint256 value;
            bytes32 payloadHash;
            uint256 feeLimit;
            uint256 feePerUnit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;
    use alloy_sol_types::SolCall;

    #[test]
    fn test_entry_point_selectors() {
        assert_eq!(gateway::IGatewayAccount::validateUserOpCall::SELECTOR, hex!("19822f7c"));
        assert_eq!(gateway::IGatewayAccount::executeCall::SELECTOR, hex!("b61d27f6"));
        assert_eq!(sequencer::ACCOUNT_VALIDATION_SUCCESS_MAGIC, hex!("202bcce7"));
    }
}
