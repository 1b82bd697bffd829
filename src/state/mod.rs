//! Versioned Bridge State
//!
//! The state behind the proxy. A deployment starts at V1 and may be
//! migrated once to V2; the migration is the only way between versions.
//!
//! Snapshots are stored as `(schema version, JSON body)` pairs; see
//! [`VersionedState::to_snapshot`]. A [`BridgeSnapshot`] adds the token
//! ledgers, which live outside the bridge state.

pub mod queue;
pub mod v1;
pub mod v2;

pub use queue::BurnQueue;
pub use v1::StateV1;
pub use v2::{migrate_v1_to_v2, StateV2};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::error::{BridgeError, Result};

/// Logic version the proxy points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProtocolVersion {
    V1,
    V2,
}

impl ProtocolVersion {
    pub fn as_u32(&self) -> u32 {
        match self {
            ProtocolVersion::V1 => 1,
            ProtocolVersion::V2 => 2,
        }
    }

    pub fn from_u32(value: u32) -> Result<Self> {
        match value {
            1 => Ok(ProtocolVersion::V1),
            2 => Ok(ProtocolVersion::V2),
            other => Err(BridgeError::InvalidEntry(format!(
                "unknown protocol version {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.as_u32())
    }
}

impl FromStr for ProtocolVersion {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches(['v', 'V']);
        let value = digits.parse::<u32>().map_err(|_| {
            BridgeError::InvalidEntry(format!("unknown protocol version {:?}", s))
        })?;
        Self::from_u32(value)
    }
}

/// Bridge state tagged with its layout version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedState {
    V1(StateV1),
    V2(StateV2),
}

impl Default for VersionedState {
    fn default() -> Self {
        VersionedState::V1(StateV1::default())
    }
}

impl VersionedState {
    pub fn version(&self) -> ProtocolVersion {
        match self {
            VersionedState::V1(_) => ProtocolVersion::V1,
            VersionedState::V2(_) => ProtocolVersion::V2,
        }
    }

    /// The V1 fields, present in every version
    pub fn base(&self) -> &StateV1 {
        match self {
            VersionedState::V1(state) => state,
            VersionedState::V2(state) => &state.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut StateV1 {
        match self {
            VersionedState::V1(state) => state,
            VersionedState::V2(state) => &mut state.base,
        }
    }

    /// Serialize to `(schema version, JSON body)`
    pub fn to_snapshot(&self) -> Result<(u32, String)> {
        let body = match self {
            VersionedState::V1(state) => serde_json::to_string(state),
            VersionedState::V2(state) => serde_json::to_string(state),
        }
        .map_err(|e| crate::storage::StorageError::InvalidData(e.to_string()))?;

        Ok((self.version().as_u32(), body))
    }

    /// Rebuild from a stored `(schema version, JSON body)` pair
    pub fn from_snapshot(schema_version: u32, body: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| crate::storage::StorageError::InvalidData(e.to_string());

        let state = match ProtocolVersion::from_u32(schema_version)? {
            ProtocolVersion::V1 => VersionedState::V1(serde_json::from_str(body).map_err(invalid)?),
            ProtocolVersion::V2 => VersionedState::V2(serde_json::from_str(body).map_err(invalid)?),
        };

        if !state.base().burn_queue.is_dense() {
            return Err(crate::storage::StorageError::InvalidData(
                "burn queue sequence numbers are not dense".to_string(),
            )
            .into());
        }

        Ok(state)
    }
}

/// Bridge state plus the ledgers of the tokens it deployed.
///
/// This is the unit that is persisted, and the checkpoint an operation is
/// rolled back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSnapshot {
    pub state: VersionedState,
    /// Serialized token ledgers, as exported by the token deployer
    pub ledgers: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, VariantKey};

    #[test]
    fn test_version_parsing() {
        assert_eq!("1".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V1);
        assert_eq!("v2".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V2);
        assert_eq!("V2".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V2);
        assert!("3".parse::<ProtocolVersion>().is_err());
        assert!("two".parse::<ProtocolVersion>().is_err());
        assert_eq!(ProtocolVersion::V2.to_string(), "V2");
        assert!(ProtocolVersion::V1 < ProtocolVersion::V2);
    }

    #[test]
    fn test_snapshot_roundtrip_both_versions() {
        let mut v1 = StateV1::new(Address::new([9; 20]));
        v1.token_contracts
            .insert(VariantKey::base("ordi").unwrap(), Address::new([1; 20]));

        let state = VersionedState::V1(v1.clone());
        let (version, body) = state.to_snapshot().unwrap();
        assert_eq!(version, 1);
        assert_eq!(VersionedState::from_snapshot(version, &body).unwrap(), state);

        let state = VersionedState::V2(migrate_v1_to_v2(v1));
        let (version, body) = state.to_snapshot().unwrap();
        assert_eq!(version, 2);
        assert_eq!(VersionedState::from_snapshot(version, &body).unwrap(), state);
    }

    #[test]
    fn test_corrupt_snapshot_is_storage_error() {
        assert!(matches!(
            VersionedState::from_snapshot(1, "{not json"),
            Err(BridgeError::Storage(_))
        ));
        assert!(VersionedState::from_snapshot(7, "{}").is_err());
    }

    #[test]
    fn test_snapshot_with_sequence_gap_rejected() {
        let mut v1 = StateV1::new(Address::new([9; 20]));
        v1.burn_queue.append(crate::types::BurnOrder {
            destination_chain: "avax".to_string(),
            variant: VariantKey::base("ordi").unwrap(),
            amount: 1,
            destination_address: "bc1q".to_string(),
            wallet: Address::new([1; 20]),
        });
        let (version, body) = VersionedState::V1(v1).to_snapshot().unwrap();
        let tampered = body.replace("\"sequence\":0", "\"sequence\":3");

        assert!(matches!(
            VersionedState::from_snapshot(version, &tampered),
            Err(BridgeError::Storage(_))
        ));
    }

    #[test]
    fn test_base_access() {
        let mut state = VersionedState::default();
        state.base_mut().fee_recipient = Address::new([3; 20]);
        assert_eq!(state.base().fee_recipient, Address::new([3; 20]));
        assert_eq!(state.version(), ProtocolVersion::V1);
    }
}
