//! Mint Entry Authorization
//!
//! Signing tooling for off-chain attesters and the admission policies the
//! registry enforces (signer set in V1, owner only in V2).

pub mod policy;
pub mod signer;

pub use policy::{AdmissionContext, AdmissionPolicy, OwnerPolicy, SignerSetPolicy};
pub use signer::{EntrySignature, EntrySigner, SignerError};
