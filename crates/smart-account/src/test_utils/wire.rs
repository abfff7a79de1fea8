use account_abi::{
    gateway::{IGatewayAccount, PackedUserOperation},
    sequencer::Transaction,
    token::IMintableToken,
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};

use crate::{address_to_word, pack_u128_pair, sim::InMemoryHost, Call};

/// Fee parameters shared by the wire record builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fees {
    /// Total fee units the operation may use.
    pub limit: u64,
    /// Price per fee unit.
    pub per_unit: u64,
}

impl Fees {
    /// No fee at all.
    pub const FREE: Self = Self { limit: 0, per_unit: 0 };
}

/// Builds an unsigned user operation whose call data is `execute(call)`. The whole fee limit is
/// assigned to the call gas limit.
pub fn user_operation(sender: Address, nonce: u64, call: &Call, fees: Fees) -> PackedUserOperation {
    let call_data = IGatewayAccount::executeCall {
        dest: call.target,
        value: call.value,
        functionData: call.payload.clone(),
    }
    .abi_encode();

    PackedUserOperation {
        sender,
        nonce: U256::from(nonce),
        initCode: Bytes::new(),
        callData: call_data.into(),
        accountGasLimits: pack_u128_pair(0, fees.limit.into()),
        preVerificationGas: U256::ZERO,
        gasFees: pack_u128_pair(0, fees.per_unit.into()),
        paymasterAndData: Bytes::new(),
        signature: Bytes::new(),
    }
}

/// Builds an unsigned Sequencer transaction carrying `call`.
pub fn sequencer_transaction(from: Address, nonce: u64, call: &Call, fees: Fees) -> Transaction {
    Transaction {
        txType: U256::from(113),
        from: address_to_word(from),
        to: address_to_word(call.target),
        gasLimit: U256::from(fees.limit),
        gasPerPubdataByteLimit: U256::from(800),
        maxFeePerGas: U256::from(fees.per_unit),
        maxPriorityFeePerGas: U256::from(fees.per_unit),
        paymaster: U256::ZERO,
        nonce: U256::from(nonce),
        value: call.value,
        reserved: [U256::ZERO; 4],
        data: call.payload.clone(),
        signature: Bytes::new(),
        factoryDeps: Vec::new(),
        paymasterInput: Bytes::new(),
        reservedDynamic: Bytes::new(),
    }
}

/// Calldata for `mint(amount)`.
pub fn mint_payload(amount: u64) -> Bytes {
    IMintableToken::mintCall { amount: U256::from(amount) }.abi_encode().into()
}

/// Reads `holder`'s balance of the token at `token`.
pub fn token_balance(host: &mut InMemoryHost, token: Address, holder: Address) -> U256 {
    let query = IMintableToken::balanceOfCall { owner: holder }.abi_encode().into();
    let output = host.static_call(token, &query).expect("token answers balanceOf");
    U256::abi_decode(&output, true).expect("balanceOf returns a word")
}
