//! Token Deployment
//!
//! Deploys a new wrapped token and hands back its address. Deployed tokens
//! are reachable by address for the rest of the deployer's lifetime.
//! Their ledgers can be exported and re-imported so they outlive a restart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::capability::{TokenCapability, TokenError, WrappedToken};
use crate::types::Address;

/// Parameters of a token to deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    pub max_supply: u128,
    /// Sole address allowed to mint and burn
    pub minter: Address,
}

/// Trait for token deployment backends
pub trait TokenDeployer: Send + Sync {
    /// Deploy a token and return its address
    fn deploy(&mut self, spec: &TokenSpec) -> Result<Address, TokenError>;

    fn token(&self, address: &Address) -> Option<&dyn TokenCapability>;

    fn token_mut(&mut self, address: &Address) -> Option<&mut (dyn TokenCapability + 'static)>;

    /// Number of tokens deployed so far
    fn deployed(&self) -> usize;

    /// Serialize every deployed token's ledger
    fn export_ledgers(&self) -> Result<String, TokenError>;

    /// Replace all deployed tokens with a previous export
    fn import_ledgers(&mut self, ledgers: &str) -> Result<(), TokenError>;
}

/// In-process deployer backed by [`WrappedToken`]
///
/// Addresses are derived from the deployer address and a nonce, so the same
/// deployment sequence always yields the same addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTokenDeployer {
    address: Address,
    nonce: u64,
    tokens: BTreeMap<Address, WrappedToken>,
}

impl MemoryTokenDeployer {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            nonce: 0,
            tokens: BTreeMap::new(),
        }
    }

    fn next_address(&mut self) -> Address {
        let mut seed = Vec::with_capacity(28);
        seed.extend_from_slice(self.address.as_bytes());
        seed.extend_from_slice(&self.nonce.to_be_bytes());
        self.nonce += 1;
        Address::derive(&seed)
    }
}

impl Default for MemoryTokenDeployer {
    fn default() -> Self {
        Self::new(Address::derive(b"ordbridge:token-deployer"))
    }
}

impl TokenDeployer for MemoryTokenDeployer {
    fn deploy(&mut self, spec: &TokenSpec) -> Result<Address, TokenError> {
        let address = self.next_address();
        if self.tokens.contains_key(&address) {
            return Err(TokenError::Deployment(format!(
                "address collision at {}",
                address
            )));
        }

        let token = WrappedToken::new(&spec.name, &spec.symbol, spec.max_supply, spec.minter);
        self.tokens.insert(address, token);

        tracing::debug!(
            target: "ordbridge::token",
            address = %address,
            symbol = %spec.symbol,
            "Token deployed"
        );

        Ok(address)
    }

    fn token(&self, address: &Address) -> Option<&dyn TokenCapability> {
        self.tokens.get(address).map(|t| t as &dyn TokenCapability)
    }

    fn token_mut(&mut self, address: &Address) -> Option<&mut (dyn TokenCapability + 'static)> {
        self.tokens
            .get_mut(address)
            .map(|t| t as &mut (dyn TokenCapability + 'static))
    }

    fn deployed(&self) -> usize {
        self.tokens.len()
    }

    fn export_ledgers(&self) -> Result<String, TokenError> {
        serde_json::to_string(self).map_err(|e| TokenError::Snapshot(e.to_string()))
    }

    fn import_ledgers(&mut self, ledgers: &str) -> Result<(), TokenError> {
        let restored: MemoryTokenDeployer =
            serde_json::from_str(ledgers).map_err(|e| TokenError::Snapshot(e.to_string()))?;
        *self = restored;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(symbol: &str) -> TokenSpec {
        TokenSpec {
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            max_supply: 1000,
            minter: Address::new([0xaa; 20]),
        }
    }

    #[test]
    fn test_deploy_distinct_addresses() {
        let mut deployer = MemoryTokenDeployer::default();
        let a = deployer.deploy(&spec("ORDI")).unwrap();
        let b = deployer.deploy(&spec("ORDI(x100)")).unwrap();

        assert_ne!(a, b);
        assert_eq!(deployer.deployed(), 2);
        assert_eq!(deployer.token(&a).unwrap().symbol(), "ORDI");
        assert_eq!(deployer.token(&b).unwrap().name(), "ORDI(x100)");
        assert!(deployer.token(&Address::ZERO).is_none());
    }

    #[test]
    fn test_deterministic_addresses() {
        let mut first = MemoryTokenDeployer::default();
        let mut second = MemoryTokenDeployer::default();
        assert_eq!(
            first.deploy(&spec("ORDI")).unwrap(),
            second.deploy(&spec("SATS")).unwrap()
        );
    }

    #[test]
    fn test_token_mut_reaches_ledger() {
        let mut deployer = MemoryTokenDeployer::default();
        let addr = deployer.deploy(&spec("ORDI")).unwrap();
        let minter = Address::new([0xaa; 20]);
        let wallet = Address::new([1; 20]);

        deployer
            .token_mut(&addr)
            .unwrap()
            .mint(&minter, &wallet, 10)
            .unwrap();
        assert_eq!(deployer.token(&addr).unwrap().balance_of(&wallet), 10);
    }

    #[test]
    fn test_ledgers_survive_export_import() {
        let mut deployer = MemoryTokenDeployer::default();
        let addr = deployer.deploy(&spec("ORDI")).unwrap();
        let minter = Address::new([0xaa; 20]);
        let wallet = Address::new([1; 20]);
        deployer
            .token_mut(&addr)
            .unwrap()
            .mint(&minter, &wallet, 10)
            .unwrap();
        let exported = deployer.export_ledgers().unwrap();

        let mut restored = MemoryTokenDeployer::default();
        restored.import_ledgers(&exported).unwrap();
        assert_eq!(restored, deployer);
        assert_eq!(restored.token(&addr).unwrap().balance_of(&wallet), 10);

        // nonce carried over, so the next deployment does not collide
        let next = restored.deploy(&spec("SATS")).unwrap();
        assert_ne!(next, addr);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let mut deployer = MemoryTokenDeployer::default();
        let addr = deployer.deploy(&spec("ORDI")).unwrap();

        assert!(matches!(
            deployer.import_ledgers("{not json"),
            Err(TokenError::Snapshot(_))
        ));
        assert!(deployer.token(&addr).is_some());
    }
}
