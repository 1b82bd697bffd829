//! Common Error Types for OrdBridge
//!
//! Every bridge operation fails with a [`BridgeError`]. An error always
//! means the whole operation was rejected: no balance, token record,
//! consumed tx id or burn request is changed.

use thiserror::Error;

use crate::auth::SignerError;
use crate::state::ProtocolVersion;
use crate::storage::StorageError;
use crate::types::Address;

/// Root error type for the bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The tx id was already consumed (in this batch, or at any point before)
    #[error("duplicate tx id: {0}")]
    DuplicateTxId(String),

    /// No authorized signer produced the signature for this entry
    #[error("invalid signature for entry {index} (tx id {tx_id})")]
    InvalidSignature { index: usize, tx_id: String },

    /// Caller lacks the privilege for the action
    #[error("unauthorized: {caller} may not {action}")]
    Unauthorized { caller: Address, action: String },

    /// Claim or burn against a variant that was never minted
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    /// Nothing pending for this (variant, wallet)
    #[error("nothing to claim for {wallet} on {variant}")]
    InsufficientClaimable { variant: String, wallet: Address },

    /// Burn exceeds the wallet's token holdings
    #[error("insufficient {variant} balance for {wallet}: have {available}, need {requested}")]
    InsufficientTokenBalance {
        variant: String,
        wallet: Address,
        available: u128,
        requested: u128,
    },

    /// Parallel input arrays disagree in length
    #[error("array length mismatch: expected {expected}, got {actual}")]
    ArrayLengthMismatch { expected: usize, actual: usize },

    /// Minting would push the token past its max supply cap
    #[error("max supply exceeded for {variant}: requested {requested}, remaining {remaining}")]
    MaxSupplyExceeded {
        variant: String,
        requested: u128,
        remaining: u128,
    },

    #[error("invalid ticker: {0:?}")]
    InvalidTicker(String),

    #[error("invalid multiple: {0}")]
    InvalidMultiple(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The token capability could not deploy a new token
    #[error("token deployment failed: {0}")]
    TokenDeployment(String),

    /// Operation belongs to another protocol version than the deployed one
    #[error("operation requires {expected}, bridge is running {actual}")]
    WrongVersion {
        expected: ProtocolVersion,
        actual: ProtocolVersion,
    },

    #[error("signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] super::logging::LoggingError),
}

impl BridgeError {
    pub fn unauthorized(caller: &Address, action: impl Into<String>) -> Self {
        Self::Unauthorized {
            caller: *caller,
            action: action.into(),
        }
    }

    /// Check if this is a retryable error
    ///
    /// Rejections are final for the same input; only persistence failures
    /// may succeed on resubmission.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BridgeError::Storage(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            BridgeError::DuplicateTxId(_) => "DUPLICATE_TX_ID",
            BridgeError::InvalidSignature { .. } => "INVALID_SIGNATURE",
            BridgeError::Unauthorized { .. } => "UNAUTHORIZED",
            BridgeError::UnknownVariant(_) => "UNKNOWN_VARIANT",
            BridgeError::InsufficientClaimable { .. } => "INSUFFICIENT_CLAIMABLE",
            BridgeError::InsufficientTokenBalance { .. } => "INSUFFICIENT_TOKEN_BALANCE",
            BridgeError::ArrayLengthMismatch { .. } => "ARRAY_LENGTH_MISMATCH",
            BridgeError::MaxSupplyExceeded { .. } => "MAX_SUPPLY_EXCEEDED",
            BridgeError::InvalidTicker(_) => "INVALID_TICKER",
            BridgeError::InvalidMultiple(_) => "INVALID_MULTIPLE",
            BridgeError::InvalidAmount(_) => "INVALID_AMOUNT",
            BridgeError::InvalidEntry(_) => "INVALID_ENTRY",
            BridgeError::InvalidDestination(_) => "INVALID_DESTINATION",
            BridgeError::InvalidAddress(_) => "INVALID_ADDRESS",
            BridgeError::TokenDeployment(_) => "TOKEN_DEPLOYMENT_FAILED",
            BridgeError::WrongVersion { .. } => "WRONG_VERSION",
            BridgeError::Signer(_) => "SIGNER_ERROR",
            BridgeError::Storage(_) => "STORAGE_ERROR",
            BridgeError::Config(_) => "CONFIG_ERROR",
            BridgeError::Logging(_) => "LOGGING_ERROR",
        }
    }
}

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;
