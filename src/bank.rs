use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::types::Address;

/// Balance lookups used to weight token committee votes
#[cfg_attr(test, mockall::automock)]
pub trait BankKeeper: Send + Sync {
    fn balance(&self, address: &Address, denom: &str) -> u128;

    fn total_supply(&self, denom: &str) -> u128;
}

/// In-process ledger of balances. Supply is the sum of all balances of a denom.
#[derive(Debug, Default)]
pub struct MemoryBank {
    balances: RwLock<BTreeMap<(String, Address), u128>>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, address: &Address, denom: &str, amount: u128) {
        let mut balances = match self.balances.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if amount == 0 {
            balances.remove(&(denom.to_string(), address.clone()));
        } else {
            balances.insert((denom.to_string(), address.clone()), amount);
        }
    }
}

impl BankKeeper for MemoryBank {
    fn balance(&self, address: &Address, denom: &str) -> u128 {
        let balances = match self.balances.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        balances
            .get(&(denom.to_string(), address.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn total_supply(&self, denom: &str) -> u128 {
        let balances = match self.balances.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        balances
            .iter()
            .filter(|((d, _), _)| d == denom)
            .fold(0u128, |acc, (_, amount)| acc.saturating_add(*amount))
    }
}
