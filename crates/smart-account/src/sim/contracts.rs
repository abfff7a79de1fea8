//! In-memory contracts the simulator can register as call targets.

use account_abi::{
    deployer::IContractDeployer,
    token::IMintableToken::{self, IMintableTokenCalls},
};
use alloy_primitives::{keccak256, map::HashMap, Address, Bytes, FixedBytes, B256, U256};
use alloy_sol_types::{SolCall, SolError, SolInterface, SolValue};

use crate::Fault;

/// What a contract sees of the call invoking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// The immediate caller.
    pub caller: Address,
    /// The contract's own address.
    pub address: Address,
    /// Native asset transferred with the call.
    pub value: U256,
    /// Computation budget forwarded by the caller.
    pub budget: u64,
    /// Whether the call arrived through the privileged system-call path.
    pub system: bool,
}

/// An in-memory contract.
///
/// A contract that returns an error must leave its own state untouched; the host undoes the
/// value transfer.
pub trait Contract: core::fmt::Debug + Send {
    /// Handles a call with calldata `input`.
    fn call(&mut self, ctx: &CallContext, input: &Bytes) -> Result<Bytes, Fault>;
}

/// A token that mints to whoever calls `mint`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    balances: HashMap<Address, U256>,
}

impl Token {
    /// Token balance of `holder`.
    pub fn balance_of(&self, holder: Address) -> U256 {
        self.balances.get(&holder).copied().unwrap_or_default()
    }
}

impl Contract for Token {
    fn call(&mut self, ctx: &CallContext, input: &Bytes) -> Result<Bytes, Fault> {
        match IMintableTokenCalls::abi_decode(input, true) {
            Ok(IMintableTokenCalls::mint(call)) => {
                let balance = self.balances.entry(ctx.caller).or_default();
                *balance = balance.saturating_add(call.amount);
                Ok(Bytes::new())
            }
            Ok(IMintableTokenCalls::balanceOf(call)) => {
                Ok(self.balance_of(call.owner).abi_encode().into())
            }
            Err(_) => {
                let mut selector = FixedBytes::<4>::ZERO;
                if let Some(prefix) = input.get(..4) {
                    selector.copy_from_slice(prefix);
                }
                Err(Fault::new(IMintableToken::UnknownSelector { selector }.abi_encode()))
            }
        }
    }
}

/// A contract created through the deployer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// The account that requested the deployment.
    pub deployer: Address,
    /// Hash of the deployed bytecode.
    pub bytecode_hash: B256,
    /// Constructor input.
    pub input: Bytes,
    /// Native asset forwarded with the deployment.
    pub value: U256,
}

/// The deployer system contract. Accepts `create(salt, bytecodeHash, input)` only through the
/// system-call path and derives the new address CREATE2-style from the requesting account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractDeployer {
    deployments: HashMap<Address, Deployment>,
}

impl ContractDeployer {
    /// The deployment recorded at `address`, if any.
    pub fn deployment(&self, address: Address) -> Option<&Deployment> {
        self.deployments.get(&address)
    }

    /// The address `deployer` obtains for `salt`, `bytecode_hash` and `input`.
    pub fn derive_address(
        deployer: Address,
        salt: B256,
        bytecode_hash: B256,
        input: &[u8],
    ) -> Address {
        let init_hash = keccak256([bytecode_hash.as_slice(), keccak256(input).as_slice()].concat());
        deployer.create2(salt, init_hash)
    }
}

impl Contract for ContractDeployer {
    fn call(&mut self, ctx: &CallContext, input: &Bytes) -> Result<Bytes, Fault> {
        let malformed = || Fault::new(IContractDeployer::MalformedDeployment {}.abi_encode());
        if !ctx.system {
            return Err(malformed());
        }
        let create =
            IContractDeployer::createCall::abi_decode(input, true).map_err(|_| malformed())?;

        let address =
            Self::derive_address(ctx.caller, create._salt, create._bytecodeHash, &create._input);
        if self.deployments.contains_key(&address) {
            return Err(Fault::new(
                IContractDeployer::AddressAlreadyDeployed { deployed: address }.abi_encode(),
            ));
        }

        self.deployments.insert(
            address,
            Deployment {
                deployer: ctx.caller,
                bytecode_hash: create._bytecodeHash,
                input: create._input,
                value: ctx.value,
            },
        );
        Ok(address.abi_encode().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const CALLER: Address = address!("0x1000000000000000000000000000000000000001");

    fn ctx(system: bool) -> CallContext {
        CallContext { caller: CALLER, address: Address::ZERO, value: U256::ZERO, budget: 0, system }
    }

    #[test]
    fn test_token_mints_to_caller() {
        let mut token = Token::default();
        let mint: Bytes = IMintableToken::mintCall { amount: U256::from(3) }.abi_encode().into();
        token.call(&ctx(false), &mint).unwrap();
        token.call(&ctx(false), &mint).unwrap();
        assert_eq!(token.balance_of(CALLER), U256::from(6));

        let query: Bytes = IMintableToken::balanceOfCall { owner: CALLER }.abi_encode().into();
        let out = token.call(&ctx(false), &query).unwrap();
        assert_eq!(U256::abi_decode(&out, true).unwrap(), U256::from(6));
    }

    #[test]
    fn test_deployer_requires_system_call() {
        let mut deployer = ContractDeployer::default();
        let create: Bytes = IContractDeployer::createCall {
            _salt: B256::ZERO,
            _bytecodeHash: B256::repeat_byte(1),
            _input: Bytes::new(),
        }
        .abi_encode()
        .into();

        assert!(deployer.call(&ctx(false), &create).is_err());

        let out = deployer.call(&ctx(true), &create).unwrap();
        let deployed = Address::abi_decode(&out, true).unwrap();
        assert_eq!(
            deployed,
            ContractDeployer::derive_address(CALLER, B256::ZERO, B256::repeat_byte(1), &[])
        );
        assert_eq!(deployer.deployment(deployed).unwrap().deployer, CALLER);

        let again = deployer.call(&ctx(true), &create).unwrap_err();
        assert_eq!(
            again.output,
            Bytes::from(IContractDeployer::AddressAlreadyDeployed { deployed }.abi_encode())
        );
    }
}
