//! V1 Bridge State
//!
//! Field order is the storage layout. V2 embeds this struct unchanged as its
//! first field; new fields go at the end of V2, never in here.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::queue::BurnQueue;
use crate::types::{Address, VariantKey};

/// Persistent state of a V1 deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateV1 {
    /// Admin identity
    pub owner: Address,
    /// Deployed token per variant key
    pub token_contracts: BTreeMap<VariantKey, Address>,
    /// Credited but not yet claimed amounts, per variant then wallet
    pub claimable: BTreeMap<VariantKey, BTreeMap<Address, u128>>,
    /// Every tx id ever admitted
    pub consumed_tx_ids: BTreeSet<String>,
    pub burn_queue: BurnQueue,
    /// Zero until set by the owner
    pub fee_recipient: Address,
}

impl StateV1 {
    /// Create a fresh state for a new deployment
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    pub fn token_contract(&self, variant: &VariantKey) -> Option<Address> {
        self.token_contracts.get(variant).copied()
    }

    pub fn claimable_of(&self, variant: &VariantKey, wallet: &Address) -> u128 {
        self.claimable
            .get(variant)
            .and_then(|wallets| wallets.get(wallet))
            .copied()
            .unwrap_or(0)
    }

    pub fn set_claimable(&mut self, variant: &VariantKey, wallet: &Address, amount: u128) {
        if amount == 0 {
            if let Some(wallets) = self.claimable.get_mut(variant) {
                wallets.remove(wallet);
                if wallets.is_empty() {
                    self.claimable.remove(variant);
                }
            }
        } else {
            self.claimable
                .entry(variant.clone())
                .or_default()
                .insert(*wallet, amount);
        }
    }

    pub fn is_consumed(&self, tx_id: &str) -> bool {
        self.consumed_tx_ids.contains(tx_id)
    }

    /// Sum of all pending claimable amounts (saturating)
    pub fn total_claimable(&self) -> u128 {
        self.claimable
            .values()
            .flat_map(|wallets| wallets.values())
            .fold(0u128, |acc, amount| acc.saturating_add(*amount))
    }
}
