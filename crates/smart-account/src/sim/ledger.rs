use alloy_primitives::{map::HashMap, Address, U256};

use crate::{BalanceAuthority, NonceLedger};

/// Next unused nonce per account. Accounts never seen start at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNonceLedger {
    nonces: HashMap<Address, U256>,
}

impl MemoryNonceLedger {
    /// Overwrites the next nonce of `account`.
    pub fn set(&mut self, account: Address, nonce: U256) {
        self.nonces.insert(account, nonce);
    }
}

impl NonceLedger for MemoryNonceLedger {
    fn current_nonce(&self, account: Address) -> U256 {
        self.nonces.get(&account).copied().unwrap_or_default()
    }

    fn consume_if_equals(&mut self, account: Address, nonce: U256) -> bool {
        let current = self.nonces.entry(account).or_default();
        if *current != nonce {
            return false;
        }
        // A ledger at U256::MAX is exhausted
        match current.checked_add(U256::from(1)) {
            Some(next) => {
                *current = next;
                true
            }
            None => false,
        }
    }
}

/// Native-asset balances per account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBalances {
    balances: HashMap<Address, U256>,
}

impl MemoryBalances {
    /// Overwrites the balance of `account`.
    pub fn set(&mut self, account: Address, balance: U256) {
        self.balances.insert(account, balance);
    }
}

impl BalanceAuthority for MemoryBalances {
    fn balance(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> bool {
        if amount.is_zero() {
            return true;
        }
        let Some(remaining) = self.balance(from).checked_sub(amount) else {
            return false;
        };
        let Some(credited) = self.balance(to).checked_add(amount) else {
            return false;
        };
        if from != to {
            self.balances.insert(from, remaining);
            self.balances.insert(to, credited);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const ACCOUNT: Address = address!("0x1000000000000000000000000000000000000001");
    const OTHER: Address = address!("0x2000000000000000000000000000000000000002");

    #[test]
    fn test_nonce_consumed_exactly_once() {
        let mut ledger = MemoryNonceLedger::default();
        assert!(ledger.consume_if_equals(ACCOUNT, U256::ZERO));
        assert!(!ledger.consume_if_equals(ACCOUNT, U256::ZERO));
        assert!(!ledger.consume_if_equals(ACCOUNT, U256::from(2)));
        assert!(ledger.consume_if_equals(ACCOUNT, U256::from(1)));
        assert_eq!(ledger.current_nonce(ACCOUNT), U256::from(2));
        assert_eq!(ledger.current_nonce(OTHER), U256::ZERO);
    }

    #[test]
    fn test_exhausted_nonce_is_refused() {
        let mut ledger = MemoryNonceLedger::default();
        ledger.set(ACCOUNT, U256::MAX);
        assert!(!ledger.consume_if_equals(ACCOUNT, U256::MAX));
        assert_eq!(ledger.current_nonce(ACCOUNT), U256::MAX);
    }

    #[test]
    fn test_transfer_moves_or_changes_nothing() {
        let mut balances = MemoryBalances::default();
        balances.set(ACCOUNT, U256::from(10));

        assert!(!balances.transfer(ACCOUNT, OTHER, U256::from(11)));
        assert_eq!(balances.balance(ACCOUNT), U256::from(10));

        assert!(balances.transfer(ACCOUNT, OTHER, U256::from(4)));
        assert_eq!(balances.balance(ACCOUNT), U256::from(6));
        assert_eq!(balances.balance(OTHER), U256::from(4));
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut balances = MemoryBalances::default();
        balances.set(ACCOUNT, U256::from(10));
        assert!(balances.transfer(ACCOUNT, ACCOUNT, U256::from(10)));
        assert_eq!(balances.balance(ACCOUNT), U256::from(10));
    }
}
