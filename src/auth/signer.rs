//! Mint Entry Signer
//!
//! Off-chain attestation of V1 mint entries. A signer watches Bitcoin for
//! BRC-20 deposits and signs the canonical payload of each entry; the
//! registry admits the entry only if one of the configured public keys
//! verifies it.
//!
//! Keys are secp256k1 ECDSA. Signatures are the 64-byte compact form,
//! hex-encoded on the wire.

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::common::error::BridgeError;
use crate::types::{MintEntry, ResolvedEntry};

/// Signer errors
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("malformed signature: {0}")]
    InvalidSignature(String),
}

/// Signature over a mint entry's signing payload
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntrySignature(Signature);

impl EntrySignature {
    /// Create from 64 compact bytes (r || s)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        Signature::from_slice(bytes)
            .map(Self)
            .map_err(|e| SignerError::InvalidSignature(e.to_string()))
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&self.0.to_bytes());
        out
    }

    /// Check this signature against one public key
    pub fn verifies(&self, key: &VerifyingKey, entry: &ResolvedEntry) -> bool {
        key.verify(&entry.signing_payload(), &self.0).is_ok()
    }
}

impl FromStr for EntrySignature {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim().trim_start_matches("0x"))
            .map_err(|e| SignerError::InvalidSignature(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for EntrySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for EntrySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntrySignature({})", self)
    }
}

impl TryFrom<String> for EntrySignature {
    type Error = SignerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntrySignature> for String {
    fn from(sig: EntrySignature) -> Self {
        sig.to_string()
    }
}

/// Single-key entry signer
pub struct EntrySigner {
    key: SigningKey,
}

impl EntrySigner {
    /// Generate a new random signer
    pub fn generate() -> Self {
        Self {
            key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// Create from secret key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        let key = SigningKey::from_slice(bytes).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self { key })
    }

    /// Create from hex string
    pub fn from_hex(hex: &str) -> Result<Self, SignerError> {
        let bytes = hex::decode(hex.trim().trim_start_matches("0x"))
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;

        if bytes.len() != 32 {
            return Err(SignerError::InvalidKey("key must be 32 bytes".to_string()));
        }

        Self::from_bytes(&bytes)
    }

    /// Deterministic signer for devnet and tests (secret = SHA256(seed))
    pub fn from_seed(seed: &[u8]) -> Result<Self, SignerError> {
        let secret: [u8; 32] = Sha256::digest(seed).into();
        Self::from_bytes(&secret)
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey::from(&self.key)
    }

    /// Compressed SEC1 public key, hex-encoded
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key().to_sec1_bytes())
    }

    /// Get secret key hex (for backup)
    pub fn secret_hex(&self) -> String {
        hex::encode(self.key.to_bytes())
    }

    /// Sign an already-resolved entry
    pub fn sign_resolved(&self, entry: &ResolvedEntry) -> EntrySignature {
        let sig: Signature = self.key.sign(&entry.signing_payload());
        EntrySignature(sig)
    }

    /// Sign a V1 mint entry
    pub fn sign_entry(&self, entry: &MintEntry) -> Result<EntrySignature, BridgeError> {
        Ok(self.sign_resolved(&entry.resolve()?))
    }

    /// Sign a batch, in order
    pub fn sign_batch(&self, entries: &[MintEntry]) -> Result<Vec<EntrySignature>, BridgeError> {
        entries.iter().map(|e| self.sign_entry(e)).collect()
    }
}

impl fmt::Debug for EntrySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntrySigner")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;

    fn entry(tx_id: &str) -> MintEntry {
        MintEntry::new("ordi", 1000, Address::new([0x33; 20]), tx_id, 100_000_000)
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = EntrySigner::from_seed(b"signer").unwrap();
        let e = entry("btc000001");
        let sig = signer.sign_entry(&e).unwrap();

        let resolved = e.resolve().unwrap();
        assert!(sig.verifies(&signer.verifying_key(), &resolved));

        let other = EntrySigner::from_seed(b"other").unwrap();
        assert!(!sig.verifies(&other.verifying_key(), &resolved));
    }

    #[test]
    fn test_signature_bound_to_entry() {
        let signer = EntrySigner::generate();
        let sig = signer.sign_entry(&entry("btc000001")).unwrap();
        let tampered = entry("btc000002").resolve().unwrap();
        assert!(!sig.verifies(&signer.verifying_key(), &tampered));
    }

    #[test]
    fn test_signature_hex_roundtrip() {
        let signer = EntrySigner::from_seed(b"signer").unwrap();
        let sig = signer.sign_entry(&entry("btc000001")).unwrap();

        let parsed: EntrySignature = sig.to_string().parse().unwrap();
        assert_eq!(parsed, sig);

        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json.len(), 128 + 2);
        assert!("nothex".parse::<EntrySignature>().is_err());
        assert!("abcd".parse::<EntrySignature>().is_err());
    }

    #[test]
    fn test_key_import() {
        let signer = EntrySigner::from_seed(b"signer").unwrap();
        let restored = EntrySigner::from_hex(&signer.secret_hex()).unwrap();
        assert_eq!(restored.public_key_hex(), signer.public_key_hex());

        assert!(matches!(
            EntrySigner::from_hex("abcd"),
            Err(SignerError::InvalidKey(_))
        ));
        assert!(EntrySigner::from_bytes(&[0u8; 32]).is_err());
    }
}
