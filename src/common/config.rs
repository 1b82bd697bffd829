//! Environment-based Configuration for OrdBridge
//!
//! All operator-specific values come from environment variables (a `.env`
//! file is honoured by the launcher). Devnet falls back to derived
//! development identities; every other network must name them explicitly.
//!
//! # Environment Variables
//!
//! - `ORDBRIDGE_NETWORK` - "mainnet", "testnet", or "devnet" (default: "devnet")
//! - `ORDBRIDGE_OWNER` - 0x-prefixed owner address
//! - `ORDBRIDGE_SIGNERS` - Comma-separated SEC1 hex public keys of entry signers
//! - `ORDBRIDGE_VERSION` - Protocol version to run, "1" or "2" (default: "1")
//! - `ORDBRIDGE_DB_PATH` - SQLite state file (default: "data/ordbridge.db")
//! - `ORDBRIDGE_API_PORT` - Relayer API port (default: 3002)
//! - `ORDBRIDGE_LOG_LEVEL` - Logging level (debug, info, warn, error)

use k256::ecdsa::VerifyingKey;
use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::auth::{EntrySigner, SignerSetPolicy};
use crate::state::ProtocolVersion;
use crate::types::Address;

/// Seed of the devnet entry signer
pub const DEVNET_SIGNER_SEED: &[u8] = b"ordbridge:devnet-signer";

/// Seed of the devnet owner address
pub const DEVNET_OWNER_SEED: &[u8] = b"ordbridge:devnet-owner";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("network mismatch: expected {0}, got {1}")]
    NetworkMismatch(String, String),

    #[error("signer set is empty")]
    EmptySignerSet,
}

/// Network environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            "devnet" | "dev" => Ok(Network::Devnet),
            _ => Err(ConfigError::InvalidValue(
                "ORDBRIDGE_NETWORK".to_string(),
                format!("unknown network: {}", s),
            )),
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Network environment
    pub network: Network,

    /// Bridge owner (admin surface; V2 mint-entry admission)
    pub owner: Address,

    /// Public keys allowed to sign V1 mint entries
    pub signers: Vec<VerifyingKey>,

    /// Protocol version to run
    pub version: ProtocolVersion,

    /// SQLite state file
    pub db_path: String,

    /// Relayer API port
    pub api_port: u16,

    /// Log level
    pub log_level: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            network: Network::Devnet,
            owner: Address::derive(DEVNET_OWNER_SEED),
            signers: Vec::new(),
            version: ProtocolVersion::V1,
            db_path: "data/ordbridge.db".to_string(),
            api_port: 3002,
            log_level: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let network: Network = env::var("ORDBRIDGE_NETWORK")
            .unwrap_or_else(|_| "devnet".to_string())
            .parse()?;

        let owner = match env::var("ORDBRIDGE_OWNER") {
            Ok(value) => value.parse::<Address>().map_err(|e| {
                ConfigError::InvalidValue("ORDBRIDGE_OWNER".to_string(), e.to_string())
            })?,
            Err(_) if network == Network::Devnet => Address::derive(DEVNET_OWNER_SEED),
            Err(_) => return Err(ConfigError::MissingEnvVar("ORDBRIDGE_OWNER".to_string())),
        };

        let version: ProtocolVersion = env::var("ORDBRIDGE_VERSION")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|e: crate::BridgeError| {
                ConfigError::InvalidValue("ORDBRIDGE_VERSION".to_string(), e.to_string())
            })?;

        let signers = match env::var("ORDBRIDGE_SIGNERS") {
            Ok(value) => parse_signers(&value)?,
            Err(_) if network == Network::Devnet => {
                eprintln!("WARNING: Using derived devnet entry signer - DO NOT USE WITH REAL FUNDS");
                let signer = EntrySigner::from_seed(DEVNET_SIGNER_SEED).map_err(|e| {
                    ConfigError::InvalidValue("ORDBRIDGE_SIGNERS".to_string(), e.to_string())
                })?;
                vec![signer.verifying_key()]
            }
            Err(_) if version == ProtocolVersion::V1 => {
                return Err(ConfigError::MissingEnvVar("ORDBRIDGE_SIGNERS".to_string()))
            }
            Err(_) => Vec::new(),
        };

        let db_path =
            env::var("ORDBRIDGE_DB_PATH").unwrap_or_else(|_| "data/ordbridge.db".to_string());

        let api_port = match env::var("ORDBRIDGE_API_PORT") {
            Ok(value) => value.parse().map_err(|_| {
                ConfigError::InvalidValue(
                    "ORDBRIDGE_API_PORT".to_string(),
                    "must be a port number".to_string(),
                )
            })?,
            Err(_) => 3002,
        };

        let log_level = env::var("ORDBRIDGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            network,
            owner,
            signers,
            version,
            db_path,
            api_port,
            log_level,
        })
    }

    /// Validate configuration for production readiness
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.network != Network::Mainnet {
            return Err(ConfigError::NetworkMismatch(
                "mainnet".to_string(),
                format!("{:?}", self.network),
            ));
        }

        if self.version == ProtocolVersion::V1 && self.signers.is_empty() {
            return Err(ConfigError::EmptySignerSet);
        }

        if self.owner.is_zero() {
            return Err(ConfigError::InvalidValue(
                "ORDBRIDGE_OWNER".to_string(),
                "owner cannot be the zero address".to_string(),
            ));
        }

        Ok(())
    }

    /// Admission policy for V1 deployments
    pub fn signer_policy(&self) -> SignerSetPolicy {
        SignerSetPolicy::new(self.signers.clone())
    }

    /// Print configuration summary (public keys only)
    pub fn print_summary(&self) {
        println!("=== OrdBridge Configuration ===");
        println!("Network: {:?}", self.network);
        println!("Protocol: {}", self.version);
        println!("Owner: {}", self.owner);
        println!("Entry Signers: {}", self.signers.len());
        println!("State DB: {}", self.db_path);
        println!("API Port: {}", self.api_port);
        println!("Log Level: {}", self.log_level);
        println!("===============================");
    }
}

/// Parse a comma-separated list of SEC1 hex public keys
pub fn parse_signers(value: &str) -> Result<Vec<VerifyingKey>, ConfigError> {
    let keys = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let bytes = hex::decode(s.trim_start_matches("0x")).map_err(|e| {
                ConfigError::InvalidValue("ORDBRIDGE_SIGNERS".to_string(), e.to_string())
            })?;
            VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| {
                ConfigError::InvalidValue(
                    "ORDBRIDGE_SIGNERS".to_string(),
                    format!("not a secp256k1 public key: {}", s),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if keys.is_empty() {
        return Err(ConfigError::EmptySignerSet);
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_parsing() {
        assert!(matches!("mainnet".parse::<Network>(), Ok(Network::Mainnet)));
        assert!(matches!("TEST".parse::<Network>(), Ok(Network::Testnet)));
        assert!(matches!("devnet".parse::<Network>(), Ok(Network::Devnet)));
        assert!("invalid".parse::<Network>().is_err());
    }

    #[test]
    fn test_parse_signers() {
        let a = EntrySigner::from_seed(b"signer-a").unwrap();
        let b = EntrySigner::from_seed(b"signer-b").unwrap();
        let value = format!("{}, 0x{}", a.public_key_hex(), b.public_key_hex());

        let keys = parse_signers(&value).unwrap();
        assert_eq!(keys, vec![a.verifying_key(), b.verifying_key()]);
    }

    #[test]
    fn test_parse_signers_rejects_garbage() {
        assert!(matches!(parse_signers(" , "), Err(ConfigError::EmptySignerSet)));
        assert!(matches!(
            parse_signers("zz"),
            Err(ConfigError::InvalidValue(_, _))
        ));
        assert!(matches!(
            parse_signers(&"ab".repeat(33)),
            Err(ConfigError::InvalidValue(_, _))
        ));
    }

    #[test]
    fn test_production_validation() {
        let config = BridgeConfig::default();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::NetworkMismatch(_, _))
        ));

        let config = BridgeConfig {
            network: Network::Mainnet,
            ..BridgeConfig::default()
        };
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::EmptySignerSet)
        ));

        let signer = EntrySigner::from_seed(b"prod").unwrap();
        let config = BridgeConfig {
            network: Network::Mainnet,
            signers: vec![signer.verifying_key()],
            ..BridgeConfig::default()
        };
        assert!(config.validate_for_production().is_ok());
    }
}
