//! Mint Entry Types
//!
//! A mint entry attests that a BRC-20 balance exists on Bitcoin and credits
//! the matching wrapped balance to a wallet. The external transaction id is
//! the anti-replay key.
//!
//! V1 entries carry no multiple; V2 entries name the variant explicitly.
//! Both resolve to a [`ResolvedEntry`] before they touch the ledger.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::variant::VariantKey;
use crate::common::error::BridgeError;

/// V1 mint entry (base variant only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintEntry {
    /// BRC-20 ticker as submitted (normalized on resolution)
    pub ticker: String,
    /// Amount to credit
    pub amount: u128,
    /// Beneficiary wallet
    pub wallet: Address,
    /// External (Bitcoin-side) transaction id
    pub tx_id: String,
    /// Max supply cap, applied only when the variant is first created
    pub max_supply: u128,
}

impl MintEntry {
    pub fn new(
        ticker: impl Into<String>,
        amount: u128,
        wallet: Address,
        tx_id: impl Into<String>,
        max_supply: u128,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            amount,
            wallet,
            tx_id: tx_id.into(),
            max_supply,
        }
    }

    /// Build entries from the parallel-array form of the V1 ABI:
    /// `tickers[], amounts[], users[], txIds[], initialMaxSupplies[]`.
    pub fn from_columns<S, T>(
        tickers: &[S],
        amounts: &[u128],
        wallets: &[Address],
        tx_ids: &[T],
        max_supplies: &[u128],
    ) -> Result<Vec<Self>, BridgeError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let expected = tickers.len();
        check_column(expected, amounts.len())?;
        check_column(expected, wallets.len())?;
        check_column(expected, tx_ids.len())?;
        check_column(expected, max_supplies.len())?;

        Ok((0..expected)
            .map(|i| {
                Self::new(
                    tickers[i].as_ref(),
                    amounts[i],
                    wallets[i],
                    tx_ids[i].as_ref(),
                    max_supplies[i],
                )
            })
            .collect())
    }

    pub fn resolve(&self) -> Result<ResolvedEntry, BridgeError> {
        ResolvedEntry::new(
            VariantKey::base(&self.ticker)?,
            self.amount,
            self.wallet,
            &self.tx_id,
            self.max_supply,
        )
    }
}

/// V2 mint entry with an explicit multiple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantMintEntry {
    pub ticker: String,
    /// Variant multiple (1 = base variant)
    pub multiple: u32,
    pub amount: u128,
    pub wallet: Address,
    pub tx_id: String,
    pub max_supply: u128,
}

impl VariantMintEntry {
    pub fn new(
        ticker: impl Into<String>,
        multiple: u32,
        amount: u128,
        wallet: Address,
        tx_id: impl Into<String>,
        max_supply: u128,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            multiple,
            amount,
            wallet,
            tx_id: tx_id.into(),
            max_supply,
        }
    }

    /// Build entries from the parallel-array form of the V2 ABI:
    /// `tickers[], multiples[], amounts[], users[], txIds[], initialMaxSupplies[]`.
    pub fn from_columns<S, T>(
        tickers: &[S],
        multiples: &[u32],
        amounts: &[u128],
        wallets: &[Address],
        tx_ids: &[T],
        max_supplies: &[u128],
    ) -> Result<Vec<Self>, BridgeError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let expected = tickers.len();
        check_column(expected, multiples.len())?;
        check_column(expected, amounts.len())?;
        check_column(expected, wallets.len())?;
        check_column(expected, tx_ids.len())?;
        check_column(expected, max_supplies.len())?;

        Ok((0..expected)
            .map(|i| {
                Self::new(
                    tickers[i].as_ref(),
                    multiples[i],
                    amounts[i],
                    wallets[i],
                    tx_ids[i].as_ref(),
                    max_supplies[i],
                )
            })
            .collect())
    }

    pub fn resolve(&self) -> Result<ResolvedEntry, BridgeError> {
        ResolvedEntry::new(
            VariantKey::new(&self.ticker, self.multiple)?,
            self.amount,
            self.wallet,
            &self.tx_id,
            self.max_supply,
        )
    }
}

/// A validated entry keyed by its variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub variant: VariantKey,
    pub amount: u128,
    pub wallet: Address,
    pub tx_id: String,
    pub max_supply: u128,
}

impl ResolvedEntry {
    fn new(
        variant: VariantKey,
        amount: u128,
        wallet: Address,
        tx_id: &str,
        max_supply: u128,
    ) -> Result<Self, BridgeError> {
        if amount == 0 {
            return Err(BridgeError::InvalidAmount(format!(
                "mint entry {} credits zero",
                tx_id
            )));
        }
        if tx_id.trim().is_empty() {
            return Err(BridgeError::InvalidEntry(
                "mint entry has an empty tx id".to_string(),
            ));
        }

        Ok(Self {
            variant,
            amount,
            wallet,
            tx_id: tx_id.to_string(),
            max_supply,
        })
    }

    /// Canonical bytes an authorized signer attests to.
    ///
    /// Covers ticker, amount, wallet, tx id and max supply. The multiple is
    /// not part of the attestation; only base entries are ever signed.
    pub fn signing_payload(&self) -> Vec<u8> {
        const DOMAIN: &[u8] = b"ordbridge.mint-entry.v1";

        let mut payload = Vec::with_capacity(128);
        push_field(&mut payload, DOMAIN);
        push_field(&mut payload, self.variant.ticker().as_str().as_bytes());
        push_field(&mut payload, &self.amount.to_be_bytes());
        push_field(&mut payload, self.wallet.as_bytes());
        push_field(&mut payload, self.tx_id.as_bytes());
        push_field(&mut payload, &self.max_supply.to_be_bytes());
        payload
    }
}

fn push_field(buf: &mut Vec<u8>, field: &[u8]) {
    buf.extend_from_slice(&(field.len() as u32).to_be_bytes());
    buf.extend_from_slice(field);
}

fn check_column(expected: usize, actual: usize) -> Result<(), BridgeError> {
    if expected != actual {
        return Err(BridgeError::ArrayLengthMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> Address {
        Address::new([0x22; 20])
    }

    #[test]
    fn test_from_columns_v1() {
        let entries = MintEntry::from_columns(
            &["ordi"],
            &[1000],
            &[wallet()],
            &["btc000001"],
            &[100_000_000],
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tx_id, "btc000001");
        assert_eq!(entries[0].resolve().unwrap().variant.to_string(), "ORDI");
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = MintEntry::from_columns(
            &["ordi", "sats"],
            &[1000],
            &[wallet(), wallet()],
            &["a", "b"],
            &[1, 1],
        );
        assert!(matches!(
            result,
            Err(BridgeError::ArrayLengthMismatch { expected: 2, actual: 1 })
        ));

        let result = VariantMintEntry::from_columns(
            &["ordi"],
            &[100, 1],
            &[1000],
            &[wallet()],
            &["a"],
            &[1],
        );
        assert!(matches!(result, Err(BridgeError::ArrayLengthMismatch { .. })));
    }

    #[test]
    fn test_variant_entry_resolves_multiple() {
        let entry = VariantMintEntry::new("ordi", 100, 1000, wallet(), "btc000002", 1);
        let resolved = entry.resolve().unwrap();
        assert_eq!(resolved.variant.to_string(), "ORDI(x100)");
    }

    #[test]
    fn test_zero_amount_rejected() {
        let entry = MintEntry::new("ordi", 0, wallet(), "btc000001", 1);
        assert!(matches!(entry.resolve(), Err(BridgeError::InvalidAmount(_))));
    }

    #[test]
    fn test_signing_payload_binds_fields() {
        let a = MintEntry::new("ordi", 1000, wallet(), "btc000001", 5).resolve().unwrap();
        let b = MintEntry::new("ORDI", 1000, wallet(), "btc000001", 5).resolve().unwrap();
        let c = MintEntry::new("ordi", 1001, wallet(), "btc000001", 5).resolve().unwrap();
        let d = MintEntry::new("ordi", 1000, wallet(), "btc000002", 5).resolve().unwrap();

        // ticker case is normalized before signing
        assert_eq!(a.signing_payload(), b.signing_payload());
        assert_ne!(a.signing_payload(), c.signing_payload());
        assert_ne!(a.signing_payload(), d.signing_payload());
    }
}
