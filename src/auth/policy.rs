//! Mint Entry Admission Policies
//!
//! Decides whether a batch of mint entries may be admitted. The registry
//! calls the policy after resolving every entry and before touching any
//! state, so a rejection leaves the ledger unchanged.
//!
//! - [`SignerSetPolicy`]: V1 trust model. Anyone may submit; every entry
//!   must carry a signature from a configured signer.
//! - [`OwnerPolicy`]: V2 trust model. Only the bridge owner may submit;
//!   entries carry no signatures.

use k256::ecdsa::VerifyingKey;
use std::fmt;

use super::signer::EntrySignature;
use crate::common::error::{BridgeError, Result};
use crate::common::logging::log_security_event;
use crate::types::{Address, ResolvedEntry};

/// Who is submitting, and who owns the bridge
#[derive(Debug, Clone, Copy)]
pub struct AdmissionContext {
    pub caller: Address,
    pub owner: Address,
}

/// Trait for mint entry admission
pub trait AdmissionPolicy: Send + Sync + fmt::Debug {
    /// Check the submitter alone, before any entry is looked at
    fn admit_caller(&self, _ctx: &AdmissionContext) -> Result<()> {
        Ok(())
    }

    /// Admit or reject a whole batch
    fn admit(
        &self,
        ctx: &AdmissionContext,
        entries: &[ResolvedEntry],
        signatures: &[EntrySignature],
    ) -> Result<()>;

    /// Get policy description
    fn name(&self) -> &'static str;
}

// ============================================================================
// Signer Set (V1)
// ============================================================================

/// Admits entries signed by any key of a fixed signer set
#[derive(Clone)]
pub struct SignerSetPolicy {
    signers: Vec<VerifyingKey>,
}

impl SignerSetPolicy {
    pub fn new(signers: Vec<VerifyingKey>) -> Self {
        Self { signers }
    }

    pub fn signers(&self) -> &[VerifyingKey] {
        &self.signers
    }

    fn is_signed(&self, signature: &EntrySignature, entry: &ResolvedEntry) -> bool {
        self.signers.iter().any(|key| signature.verifies(key, entry))
    }
}

impl fmt::Debug for SignerSetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerSetPolicy")
            .field("signers", &self.signers.len())
            .finish()
    }
}

impl AdmissionPolicy for SignerSetPolicy {
    fn admit(
        &self,
        ctx: &AdmissionContext,
        entries: &[ResolvedEntry],
        signatures: &[EntrySignature],
    ) -> Result<()> {
        if signatures.len() != entries.len() {
            return Err(BridgeError::ArrayLengthMismatch {
                expected: entries.len(),
                actual: signatures.len(),
            });
        }

        for (index, (entry, signature)) in entries.iter().zip(signatures).enumerate() {
            if !self.is_signed(signature, entry) {
                log_security_event(
                    "entry_signature_rejected",
                    false,
                    serde_json::json!({
                        "caller": ctx.caller.to_string(),
                        "index": index,
                        "tx_id": entry.tx_id,
                    }),
                );
                return Err(BridgeError::InvalidSignature {
                    index,
                    tx_id: entry.tx_id.clone(),
                });
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "signer-set"
    }
}

// ============================================================================
// Owner Only (V2)
// ============================================================================

/// Admits entries submitted by the bridge owner
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerPolicy;

impl AdmissionPolicy for OwnerPolicy {
    fn admit_caller(&self, ctx: &AdmissionContext) -> Result<()> {
        if ctx.caller != ctx.owner {
            log_security_event(
                "non_owner_mint_entries",
                false,
                serde_json::json!({ "caller": ctx.caller.to_string() }),
            );
            return Err(BridgeError::unauthorized(&ctx.caller, "add mint entries"));
        }
        Ok(())
    }

    fn admit(
        &self,
        ctx: &AdmissionContext,
        _entries: &[ResolvedEntry],
        _signatures: &[EntrySignature],
    ) -> Result<()> {
        self.admit_caller(ctx)
    }

    fn name(&self) -> &'static str {
        "owner-only"
    }
}
