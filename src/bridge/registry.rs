//! Mint Entry Registry
//!
//! Admits batches of mint entries and credits claimable balances. A batch
//! is all-or-nothing: it is admitted by the policy, checked for replayed
//! tx ids and overflow, and has its new tokens deployed before the first
//! byte of bridge state changes.

use std::collections::{BTreeMap, HashSet};

use crate::auth::{AdmissionContext, AdmissionPolicy, EntrySignature};
use crate::common::error::{BridgeError, Result};
use crate::common::logging::log_mint_event;
use crate::state::StateV1;
use crate::token::TokenFactory;
use crate::types::{Address, ResolvedEntry, VariantKey};

/// What a committed batch changed
#[derive(Debug, Default)]
pub struct MintOutcome {
    /// Variants that got a token in this batch, in creation order
    pub created: Vec<(VariantKey, Address)>,
    /// Number of entries credited
    pub credited: usize,
}

/// Admit a batch of resolved entries into `state`.
pub fn add_mint_entries(
    factory: &mut TokenFactory,
    policy: &dyn AdmissionPolicy,
    state: &mut StateV1,
    caller: &Address,
    entries: &[ResolvedEntry],
    signatures: &[EntrySignature],
) -> Result<MintOutcome> {
    let tx_ids: Vec<String> = entries.iter().map(|e| e.tx_id.clone()).collect();

    match apply(factory, policy, state, caller, entries, signatures) {
        Ok(outcome) => {
            let created: Vec<String> = outcome.created.iter().map(|(v, _)| v.to_string()).collect();
            log_mint_event(entries.len(), &tx_ids, &created, None);
            Ok(outcome)
        }
        Err(e) => {
            let message = e.to_string();
            log_mint_event(entries.len(), &tx_ids, &[], Some((e.error_code(), message.as_str())));
            Err(e)
        }
    }
}

fn apply(
    factory: &mut TokenFactory,
    policy: &dyn AdmissionPolicy,
    state: &mut StateV1,
    caller: &Address,
    entries: &[ResolvedEntry],
    signatures: &[EntrySignature],
) -> Result<MintOutcome> {
    let ctx = AdmissionContext {
        caller: *caller,
        owner: state.owner,
    };
    policy.admit(&ctx, entries, signatures)?;

    // Replay protection, against history and within the batch
    let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());
    for entry in entries {
        if state.is_consumed(&entry.tx_id) || !seen.insert(entry.tx_id.as_str()) {
            return Err(BridgeError::DuplicateTxId(entry.tx_id.clone()));
        }
    }

    // New balances, computed before anything is written
    let mut balances: BTreeMap<(VariantKey, Address), u128> = BTreeMap::new();
    for entry in entries {
        let key = (entry.variant.clone(), entry.wallet);
        let current = match balances.get(&key) {
            Some(pending) => *pending,
            None => state.claimable_of(&entry.variant, &entry.wallet),
        };
        let updated = current.checked_add(entry.amount).ok_or_else(|| {
            BridgeError::InvalidAmount(format!(
                "claimable balance overflow for {} on {}",
                entry.wallet, entry.variant
            ))
        })?;
        balances.insert(key, updated);
    }

    // Tokens for variants seen for the first time
    let mut created_records: BTreeMap<VariantKey, Address> = BTreeMap::new();
    let mut created = Vec::new();
    for entry in entries {
        if state.token_contracts.contains_key(&entry.variant)
            || created_records.contains_key(&entry.variant)
        {
            continue;
        }
        let address = factory.get_or_create(&mut created_records, &entry.variant, entry.max_supply)?;
        created.push((entry.variant.clone(), address));
    }

    // Commit
    state.token_contracts.extend(created_records);
    for ((variant, wallet), amount) in &balances {
        state.set_claimable(variant, wallet, *amount);
    }
    for entry in entries {
        state.consumed_tx_ids.insert(entry.tx_id.clone());
        tracing::debug!(
            target: "ordbridge::mint",
            tx_id = %entry.tx_id,
            variant = %entry.variant,
            wallet = %entry.wallet,
            amount = %entry.amount,
            "Mint entry credited"
        );
    }

    Ok(MintOutcome {
        created,
        credited: entries.len(),
    })
}
