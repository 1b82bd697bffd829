//! Claim Ledger
//!
//! Turns a credited balance into wrapped tokens. The whole pending amount
//! is minted to the claiming wallet and the balance drops to zero; if the
//! mint fails the balance is left as it was.

use crate::common::error::{BridgeError, Result};
use crate::common::logging::log_claim_event;
use crate::state::StateV1;
use crate::token::TokenFactory;
use crate::types::{Address, VariantKey};

/// Claim everything `wallet` has pending on `variant`. Returns the amount minted.
pub fn claim(
    factory: &mut TokenFactory,
    state: &mut StateV1,
    wallet: &Address,
    variant: &VariantKey,
) -> Result<u128> {
    let result = apply(factory, state, wallet, variant);

    match &result {
        Ok(amount) => log_claim_event(&variant.to_string(), &wallet.to_string(), *amount, None),
        Err(e) => {
            let message = e.to_string();
            log_claim_event(
                &variant.to_string(),
                &wallet.to_string(),
                0,
                Some((e.error_code(), message.as_str())),
            )
        }
    }

    result
}

fn apply(
    factory: &mut TokenFactory,
    state: &mut StateV1,
    wallet: &Address,
    variant: &VariantKey,
) -> Result<u128> {
    let token = state
        .token_contract(variant)
        .ok_or_else(|| BridgeError::UnknownVariant(variant.to_string()))?;

    let amount = state.claimable_of(variant, wallet);
    if amount == 0 {
        return Err(BridgeError::InsufficientClaimable {
            variant: variant.to_string(),
            wallet: *wallet,
        });
    }

    factory.mint(&token, variant, wallet, amount)?;
    state.set_claimable(variant, wallet, 0);

    Ok(amount)
}
