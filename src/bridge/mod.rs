//! Bridge Core
//!
//! Mint entry registry, claim ledger and burn-for-BRC queue, served by the
//! upgradeable [`OrdBridge`].
//!
//! Flow:
//! 1. Attested BRC-20 deposits arrive as mint entries and credit claimable balances
//! 2. Wallets claim, minting the wrapped token of the entry's variant
//! 3. Wallets burn wrapped tokens, queueing a withdrawal for the relayer
//! 4. The relayer pages through the queue and pays out on Bitcoin

pub mod burn;
pub mod claim;
pub mod proxy;
pub mod registry;

pub use proxy::{BridgeStats, BridgeV1, BridgeV2, OrdBridge, TokenInfo};
pub use registry::MintOutcome;
