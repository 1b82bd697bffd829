//! Burn-for-BRC Types
//!
//! A burn request pairs the destruction of wrapped tokens with a withdrawal
//! order for the Bitcoin side. Requests are appended to the queue with a
//! dense, strictly increasing sequence number and are never removed by the
//! bridge; the relayer tracks what it has paid out.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::variant::VariantKey;

/// A queued withdrawal request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnRequest {
    /// Position in the queue, starting at 0
    pub sequence: u64,
    /// Chain label the burn happened on (e.g. "avax")
    pub destination_chain: String,
    /// Variant whose wrapped tokens were burned
    pub variant: VariantKey,
    /// Burned amount
    pub amount: u128,
    /// BRC-20 destination address or identifier
    pub destination_address: String,
    /// Wallet that burned the tokens
    pub wallet: Address,
}

/// Caller-supplied part of a burn, before sequencing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnOrder {
    pub destination_chain: String,
    pub variant: VariantKey,
    pub amount: u128,
    pub destination_address: String,
    pub wallet: Address,
}

impl BurnOrder {
    /// Attach the queue position
    pub fn into_request(self, sequence: u64) -> BurnRequest {
        BurnRequest {
            sequence,
            destination_chain: self.destination_chain,
            variant: self.variant,
            amount: self.amount,
            destination_address: self.destination_address,
            wallet: self.wallet,
        }
    }
}
