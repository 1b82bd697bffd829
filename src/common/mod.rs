//! Common Infrastructure Module
//!
//! Shared utilities and configuration for the OrdBridge core.
//!
//! This module contains:
//! - Configuration loading from environment variables
//! - Structured logging setup
//! - Common error types

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{BridgeConfig, ConfigError, Network};
pub use error::{BridgeError, Result};
pub use logging::{
    generate_correlation_id, init_from_config, init_logging, log_burn_event, log_claim_event,
    log_mint_event, log_security_event, log_upgrade_event, ErrorDetails, EventCategory, LogEvent,
    LogLevel, LoggingError,
};
