//! Wrapped Token Capability
//!
//! The bridge never holds token balances itself. Each variant is backed by
//! one fungible token exposing the capability below; only the bridge
//! (the token's minter) may mint or burn through it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Address;

/// Token operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("caller {0} is not the token minter")]
    Unauthorized(Address),

    #[error("max supply exceeded: requested {requested}, remaining {remaining}")]
    MaxSupplyExceeded { requested: u128, remaining: u128 },

    #[error("insufficient balance: have {available}, need {requested}")]
    InsufficientBalance { available: u128, requested: u128 },

    #[error("no token at {0}")]
    NotFound(Address),

    #[error("deployment failed: {0}")]
    Deployment(String),

    #[error("invalid token ledger snapshot: {0}")]
    Snapshot(String),
}

/// Fungible token as seen by the bridge
pub trait TokenCapability: Send + Sync {
    fn name(&self) -> &str;

    fn symbol(&self) -> &str;

    fn decimals(&self) -> u8;

    /// Hard cap on total supply
    fn max_supply(&self) -> u128;

    fn total_supply(&self) -> u128;

    fn balance_of(&self, wallet: &Address) -> u128;

    /// Mint to `wallet`. Only the minter may call.
    fn mint(&mut self, caller: &Address, wallet: &Address, amount: u128) -> Result<(), TokenError>;

    /// Burn from `wallet`. Only the minter may call.
    fn burn(&mut self, caller: &Address, wallet: &Address, amount: u128) -> Result<(), TokenError>;
}

/// In-process capped token with a single minter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedToken {
    name: String,
    symbol: String,
    max_supply: u128,
    total_supply: u128,
    minter: Address,
    balances: BTreeMap<Address, u128>,
}

impl WrappedToken {
    pub const DECIMALS: u8 = 18;

    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        max_supply: u128,
        minter: Address,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            max_supply,
            total_supply: 0,
            minter,
            balances: BTreeMap::new(),
        }
    }

    pub fn minter(&self) -> &Address {
        &self.minter
    }

    fn only_minter(&self, caller: &Address) -> Result<(), TokenError> {
        if caller != &self.minter {
            return Err(TokenError::Unauthorized(*caller));
        }
        Ok(())
    }
}

impl TokenCapability for WrappedToken {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn decimals(&self) -> u8 {
        Self::DECIMALS
    }

    fn max_supply(&self) -> u128 {
        self.max_supply
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn balance_of(&self, wallet: &Address) -> u128 {
        self.balances.get(wallet).copied().unwrap_or(0)
    }

    fn mint(&mut self, caller: &Address, wallet: &Address, amount: u128) -> Result<(), TokenError> {
        self.only_minter(caller)?;

        let remaining = self.max_supply.saturating_sub(self.total_supply);
        if amount > remaining {
            return Err(TokenError::MaxSupplyExceeded {
                requested: amount,
                remaining,
            });
        }

        self.total_supply += amount;
        *self.balances.entry(*wallet).or_insert(0) += amount;
        Ok(())
    }

    fn burn(&mut self, caller: &Address, wallet: &Address, amount: u128) -> Result<(), TokenError> {
        self.only_minter(caller)?;

        let available = self.balance_of(wallet);
        if amount > available {
            return Err(TokenError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let left = available - amount;
        if left == 0 {
            self.balances.remove(wallet);
        } else {
            self.balances.insert(*wallet, left);
        }
        self.total_supply -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINTER: Address = Address::new([0xaa; 20]);
    const ALICE: Address = Address::new([0x01; 20]);

    #[test]
    fn test_mint_and_burn() {
        let mut token = WrappedToken::new("ORDI", "ORDI", 10_000, MINTER);
        token.mint(&MINTER, &ALICE, 1000).unwrap();
        assert_eq!(token.balance_of(&ALICE), 1000);
        assert_eq!(token.total_supply(), 1000);

        token.burn(&MINTER, &ALICE, 400).unwrap();
        assert_eq!(token.balance_of(&ALICE), 600);
        assert_eq!(token.total_supply(), 600);
        assert_eq!(token.decimals(), 18);
    }

    #[test]
    fn test_only_minter() {
        let mut token = WrappedToken::new("ORDI", "ORDI", 10_000, MINTER);
        assert_eq!(
            token.mint(&ALICE, &ALICE, 1),
            Err(TokenError::Unauthorized(ALICE))
        );
        assert_eq!(
            token.burn(&ALICE, &ALICE, 0),
            Err(TokenError::Unauthorized(ALICE))
        );
    }

    #[test]
    fn test_max_supply_cap() {
        let mut token = WrappedToken::new("ORDI", "ORDI", 1000, MINTER);
        token.mint(&MINTER, &ALICE, 900).unwrap();
        assert_eq!(
            token.mint(&MINTER, &ALICE, 101),
            Err(TokenError::MaxSupplyExceeded {
                requested: 101,
                remaining: 100
            })
        );
        token.mint(&MINTER, &ALICE, 100).unwrap();
        assert_eq!(token.total_supply(), 1000);
    }

    #[test]
    fn test_burn_more_than_balance() {
        let mut token = WrappedToken::new("ORDI", "ORDI", 1000, MINTER);
        token.mint(&MINTER, &ALICE, 10).unwrap();
        assert_eq!(
            token.burn(&MINTER, &ALICE, 11),
            Err(TokenError::InsufficientBalance {
                available: 10,
                requested: 11
            })
        );
        assert_eq!(token.balance_of(&ALICE), 10);
    }
}
