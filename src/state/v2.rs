//! V2 Bridge State and the V1 -> V2 Migration
//!
//! V2 is the V1 state, untouched, followed by appended fields. Variant keys
//! recorded under V1 are base keys (`ORDI`), which is exactly the key V2
//! uses for multiple 1, so no key is rewritten during migration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::v1::StateV1;
use crate::types::{Ticker, VariantKey};

/// Persistent state of a V2 deployment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateV2 {
    /// Every V1 field, in V1 order
    pub base: StateV1,
    /// Mint entries are admitted on owner privilege instead of signatures
    #[serde(default)]
    pub owner_admission: bool,
    /// Multiples ever recorded per ticker
    #[serde(default)]
    pub variants_by_ticker: BTreeMap<Ticker, BTreeSet<u32>>,
}

impl StateV2 {
    /// Record that `variant` has a token, for the per-ticker index
    pub fn index_variant(&mut self, variant: &VariantKey) {
        self.variants_by_ticker
            .entry(variant.ticker().clone())
            .or_default()
            .insert(variant.multiple());
    }

    /// All variants of a ticker, ascending by multiple
    pub fn variants_of(&self, ticker: &Ticker) -> Vec<VariantKey> {
        self.variants_by_ticker
            .get(ticker)
            .into_iter()
            .flatten()
            .filter_map(|m| VariantKey::from_ticker(ticker.clone(), *m).ok())
            .collect()
    }
}

/// Migrate a V1 state to V2.
///
/// Pure and lossless: the V1 state is carried over field for field, the
/// admission flag flips to owner-only and every existing token is indexed
/// under its ticker.
pub fn migrate_v1_to_v2(v1: StateV1) -> StateV2 {
    let mut v2 = StateV2 {
        base: v1,
        owner_admission: true,
        variants_by_ticker: BTreeMap::new(),
    };

    let variants: Vec<VariantKey> = v2.base.token_contracts.keys().cloned().collect();
    for variant in &variants {
        v2.index_variant(variant);
    }

    v2
}
