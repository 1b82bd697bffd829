//! Shared Types Module
//!
//! Plain data carried between the registry, claim ledger, burn queue,
//! storage and API layers.

pub mod address;
pub mod burn;
pub mod entry;
pub mod variant;

pub use address::{Address, AddressError};
pub use burn::{BurnOrder, BurnRequest};
pub use entry::{MintEntry, ResolvedEntry, VariantMintEntry};
pub use variant::{Ticker, VariantKey};
