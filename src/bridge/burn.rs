//! Burn-for-BRC
//!
//! Destroys wrapped tokens and queues the matching BRC-20 withdrawal for
//! the relayer. The request is queued only if the burn went through.

use crate::common::error::{BridgeError, Result};
use crate::common::logging::log_burn_event;
use crate::state::StateV1;
use crate::token::TokenFactory;
use crate::types::{BurnOrder, BurnRequest};

/// Burn the order's amount from its wallet and append the request.
pub fn burn_for_brc(
    factory: &mut TokenFactory,
    state: &mut StateV1,
    order: BurnOrder,
) -> Result<BurnRequest> {
    let variant = order.variant.to_string();
    let wallet = order.wallet.to_string();
    let amount = order.amount;
    let chain = order.destination_chain.clone();

    match apply(factory, state, order) {
        Ok(request) => {
            log_burn_event(Some(request.sequence), &variant, &wallet, amount, &chain, None);
            Ok(request)
        }
        Err(e) => {
            let message = e.to_string();
            log_burn_event(
                None,
                &variant,
                &wallet,
                amount,
                &chain,
                Some((e.error_code(), message.as_str())),
            );
            Err(e)
        }
    }
}

fn apply(factory: &mut TokenFactory, state: &mut StateV1, order: BurnOrder) -> Result<BurnRequest> {
    if order.amount == 0 {
        return Err(BridgeError::InvalidAmount("burn amount must be positive".to_string()));
    }
    if order.destination_chain.trim().is_empty() {
        return Err(BridgeError::InvalidDestination(
            "destination chain is empty".to_string(),
        ));
    }
    if order.destination_address.trim().is_empty() {
        return Err(BridgeError::InvalidDestination(
            "destination address is empty".to_string(),
        ));
    }

    let token = state
        .token_contract(&order.variant)
        .ok_or_else(|| BridgeError::UnknownVariant(order.variant.to_string()))?;

    factory.burn(&token, &order.variant, &order.wallet, order.amount)?;

    Ok(state.burn_queue.append(order))
}
