//! OrdBridge - BRC-20 <-> ERC20 Bridge Core
//!
//! Moves BRC-20 balances from Bitcoin into wrapped fungible tokens and back.
//!
//! ## Flow
//!
//! 1. **Mint entries** - attested deposits credit claimable balances,
//!    keyed by variant (`ORDI`, `ORDI(x100)`) and wallet
//! 2. **Claim** - a wallet mints its whole pending balance as wrapped tokens
//! 3. **Burn-for-BRC** - a wallet burns wrapped tokens; the withdrawal is
//!    queued for the relayer, which pays out on Bitcoin
//!
//! ## Versions
//!
//! - **V1** - any submitter, every mint entry signed by a configured signer;
//!   base variants only
//! - **V2** - owner-submitted mint entries without signatures; explicit
//!   multiples. V2 state is V1 state plus appended fields, migrated in place.

pub mod api;
pub mod auth;
pub mod bridge;
pub mod common;
pub mod service;
pub mod state;
pub mod storage;
pub mod token;
pub mod types;

// Re-exports: errors and configuration
pub use common::{BridgeConfig, BridgeError, ConfigError, Network, Result};

// Re-exports: bridge
pub use bridge::{BridgeStats, BridgeV1, BridgeV2, OrdBridge, TokenInfo};

// Re-exports: authorization
pub use auth::{
    AdmissionContext, AdmissionPolicy, EntrySignature, EntrySigner, OwnerPolicy, SignerError,
    SignerSetPolicy,
};

// Re-exports: state and persistence
pub use state::{
    migrate_v1_to_v2, BridgeSnapshot, BurnQueue, ProtocolVersion, StateV1, StateV2, VersionedState,
};
pub use storage::{MemoryStateStore, SqliteStateStore, StateStore, StorageError};

// Re-exports: tokens
pub use token::{
    MemoryTokenDeployer, TokenCapability, TokenDeployer, TokenError, TokenFactory, TokenSpec,
    WrappedToken,
};

// Re-exports: service
pub use service::{BridgeService, SharedBridge};

// Re-exports: plain data
pub use types::{
    Address, BurnOrder, BurnRequest, MintEntry, ResolvedEntry, Ticker, VariantKey,
    VariantMintEntry,
};
