//! Token Factory
//!
//! One wrapped token per variant key, deployed on first use and never
//! replaced. Name and symbol are both the variant key string (`ORDI`,
//! `ORDI(x100)`); the max supply cap is fixed at creation.

use std::collections::BTreeMap;

use super::capability::{TokenCapability, TokenError};
use super::deployer::{TokenDeployer, TokenSpec};
use crate::common::error::{BridgeError, Result};
use crate::storage::StorageError;
use crate::types::{Address, VariantKey};

/// Deploys and drives the per-variant tokens on behalf of the bridge
pub struct TokenFactory {
    deployer: Box<dyn TokenDeployer>,
    /// The bridge address; minter of every token the factory deploys
    minter: Address,
}

impl TokenFactory {
    pub fn new(deployer: Box<dyn TokenDeployer>, minter: Address) -> Self {
        Self { deployer, minter }
    }

    pub fn minter(&self) -> &Address {
        &self.minter
    }

    /// Return the token recorded for `variant`, deploying and recording one
    /// if there is none. `initial_max_supply` only applies to a new token.
    pub fn get_or_create(
        &mut self,
        records: &mut BTreeMap<VariantKey, Address>,
        variant: &VariantKey,
        initial_max_supply: u128,
    ) -> Result<Address> {
        if let Some(address) = records.get(variant) {
            return Ok(*address);
        }

        let symbol = variant.to_string();
        let spec = TokenSpec {
            name: symbol.clone(),
            symbol,
            max_supply: initial_max_supply,
            minter: self.minter,
        };

        let address = self
            .deployer
            .deploy(&spec)
            .map_err(|e| BridgeError::TokenDeployment(format!("{}: {}", variant, e)))?;
        records.insert(variant.clone(), address);

        tracing::info!(
            target: "ordbridge::token",
            variant = %variant,
            address = %address,
            max_supply = %initial_max_supply,
            "Created token for variant"
        );

        Ok(address)
    }

    pub fn token(&self, address: &Address) -> Option<&dyn TokenCapability> {
        self.deployer.token(address)
    }

    /// Mint `amount` of the variant's token to `wallet`
    pub fn mint(
        &mut self,
        token: &Address,
        variant: &VariantKey,
        wallet: &Address,
        amount: u128,
    ) -> Result<()> {
        let minter = self.minter;
        let capability = self.token_mut(token, variant)?;
        capability
            .mint(&minter, wallet, amount)
            .map_err(|e| token_error(e, variant, wallet, &minter))
    }

    /// Burn `amount` of the variant's token from `wallet`
    pub fn burn(
        &mut self,
        token: &Address,
        variant: &VariantKey,
        wallet: &Address,
        amount: u128,
    ) -> Result<()> {
        let minter = self.minter;
        let capability = self.token_mut(token, variant)?;
        capability
            .burn(&minter, wallet, amount)
            .map_err(|e| token_error(e, variant, wallet, &minter))
    }

    pub fn deployed(&self) -> usize {
        self.deployer.deployed()
    }

    /// Serialized ledgers of every token deployed so far
    pub fn export_ledgers(&self) -> Result<String> {
        self.deployer.export_ledgers().map_err(snapshot_error)
    }

    /// Replace every token ledger with a previous export
    pub fn import_ledgers(&mut self, ledgers: &str) -> Result<()> {
        self.deployer.import_ledgers(ledgers).map_err(snapshot_error)
    }

    fn token_mut(
        &mut self,
        token: &Address,
        variant: &VariantKey,
    ) -> Result<&mut (dyn TokenCapability + 'static)> {
        self.deployer.token_mut(token).ok_or_else(|| {
            BridgeError::TokenDeployment(format!("{} token not found at {}", variant, token))
        })
    }
}

impl std::fmt::Debug for TokenFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenFactory")
            .field("minter", &self.minter)
            .field("deployed", &self.deployer.deployed())
            .finish()
    }
}

fn token_error(err: TokenError, variant: &VariantKey, wallet: &Address, minter: &Address) -> BridgeError {
    match err {
        TokenError::MaxSupplyExceeded {
            requested,
            remaining,
        } => BridgeError::MaxSupplyExceeded {
            variant: variant.to_string(),
            requested,
            remaining,
        },
        TokenError::InsufficientBalance {
            available,
            requested,
        } => BridgeError::InsufficientTokenBalance {
            variant: variant.to_string(),
            wallet: *wallet,
            available,
            requested,
        },
        TokenError::Unauthorized(_) => {
            BridgeError::unauthorized(minter, format!("operate the {} token", variant))
        }
        TokenError::NotFound(addr) => {
            BridgeError::TokenDeployment(format!("{} token not found at {}", variant, addr))
        }
        TokenError::Deployment(msg) => BridgeError::TokenDeployment(msg),
        TokenError::Snapshot(_) => snapshot_error(err),
    }
}

fn snapshot_error(err: TokenError) -> BridgeError {
    StorageError::InvalidData(err.to_string()).into()
}
