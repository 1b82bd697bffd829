//! Structured Logging for OrdBridge
//!
//! Provides structured logging with:
//! - JSON output for log aggregation (enabled on mainnet)
//! - Correlation IDs tying a service operation to its log lines
//! - Bridge event logging (mint entries, claims, burns, upgrades)
//! - Security event logging (rejected signatures, unauthorized callers)
//!
//! # Usage
//!
//! ```rust,ignore
//! use ordbridge::common::logging::{init_logging, LogLevel};
//!
//! init_logging(LogLevel::Info, true)?;
//! tracing::info!(target: "ordbridge::mint", tx_id = %id, "Entry recorded");
//! ```

use serde::Serialize;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

// ============================================================================
// Log Levels
// ============================================================================

/// Application log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

// ============================================================================
// Structured Event Types
// ============================================================================

/// Event categories for structured logging
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Mint entry admission
    Mint,
    /// Claims of credited balances
    Claim,
    /// Burn-for-BRC requests
    Burn,
    /// Protocol upgrades
    Upgrade,
    /// Security events (signature and privilege failures)
    Security,
    /// System events (startup, shutdown)
    System,
}

/// Structured log event
#[derive(Debug, Serialize)]
pub struct LogEvent {
    /// Event timestamp (ISO 8601)
    pub timestamp: String,
    pub level: String,
    pub category: EventCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

/// Error details for error events
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl LogEvent {
    pub fn new(level: LogLevel, category: EventCategory, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: level.as_filter().to_uppercase(),
            category,
            message: message.into(),
            correlation_id: None,
            data: None,
            error: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error = Some(ErrorDetails {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"error\": \"failed to serialize log\", \"message\": \"{}\"}}",
                self.message
            )
        })
    }
}

// ============================================================================
// Bridge Event Logging
// ============================================================================
//
// Amounts are logged as decimal strings: they are u128 and would not fit a
// JSON number.

/// Log a security-related event
pub fn log_security_event(event_type: &str, success: bool, details: serde_json::Value) {
    let level = if success { LogLevel::Info } else { LogLevel::Warn };
    let event = LogEvent::new(level, EventCategory::Security, event_type).with_data(
        serde_json::json!({
            "success": success,
            "details": details
        }),
    );

    if success {
        tracing::info!(target: "ordbridge::security", "{}", event.to_json());
    } else {
        tracing::warn!(target: "ordbridge::security", "{}", event.to_json());
    }
}

/// Log a mint-entry batch outcome
pub fn log_mint_event(
    batch_size: usize,
    tx_ids: &[String],
    created_variants: &[String],
    error: Option<(&str, &str)>,
) {
    let success = error.is_none();
    let level = if success { LogLevel::Info } else { LogLevel::Error };
    let mut event = LogEvent::new(level, EventCategory::Mint, "mint_entries").with_data(
        serde_json::json!({
            "batch_size": batch_size,
            "tx_ids": tx_ids,
            "created_variants": created_variants,
            "success": success
        }),
    );

    if let Some((code, message)) = error {
        event = event.with_error(code, message);
    }

    if success {
        tracing::info!(target: "ordbridge::mint", "{}", event.to_json());
    } else {
        tracing::error!(target: "ordbridge::mint", "{}", event.to_json());
    }
}

/// Log a claim outcome
pub fn log_claim_event(variant: &str, wallet: &str, amount: u128, error: Option<(&str, &str)>) {
    let success = error.is_none();
    let level = if success { LogLevel::Info } else { LogLevel::Warn };
    let mut event = LogEvent::new(level, EventCategory::Claim, "claim").with_data(
        serde_json::json!({
            "variant": variant,
            "wallet": wallet,
            "amount": amount.to_string(),
            "success": success
        }),
    );

    if let Some((code, message)) = error {
        event = event.with_error(code, message);
    }

    if success {
        tracing::info!(target: "ordbridge::claim", "{}", event.to_json());
    } else {
        tracing::warn!(target: "ordbridge::claim", "{}", event.to_json());
    }
}

/// Log a burn-for-BRC outcome
pub fn log_burn_event(
    sequence: Option<u64>,
    variant: &str,
    wallet: &str,
    amount: u128,
    destination_chain: &str,
    error: Option<(&str, &str)>,
) {
    let success = error.is_none();
    let level = if success { LogLevel::Info } else { LogLevel::Warn };
    let mut event = LogEvent::new(level, EventCategory::Burn, "burn_for_brc").with_data(
        serde_json::json!({
            "sequence": sequence,
            "variant": variant,
            "wallet": wallet,
            "amount": amount.to_string(),
            "destination_chain": destination_chain,
            "success": success
        }),
    );

    if let Some((code, message)) = error {
        event = event.with_error(code, message);
    }

    if success {
        tracing::info!(target: "ordbridge::burn", "{}", event.to_json());
    } else {
        tracing::warn!(target: "ordbridge::burn", "{}", event.to_json());
    }
}

/// Log a protocol upgrade
pub fn log_upgrade_event(from: u32, to: u32, tokens: usize, consumed_tx_ids: usize) {
    let event = LogEvent::new(LogLevel::Info, EventCategory::Upgrade, "upgrade").with_data(
        serde_json::json!({
            "from": from,
            "to": to,
            "tokens": tokens,
            "consumed_tx_ids": consumed_tx_ids
        }),
    );

    tracing::info!(target: "ordbridge::upgrade", "{}", event.to_json());
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Minimum log level to output
/// * `json_format` - Use JSON format (recommended for production)
pub fn init_logging(level: LogLevel, json_format: bool) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ordbridge={},tower_http={}",
            level.as_filter(),
            level.as_filter()
        ))
    });

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
    }

    Ok(())
}

/// Initialize logging from BridgeConfig
pub fn init_from_config(config: &super::config::BridgeConfig) -> Result<(), LoggingError> {
    let level = LogLevel::from(config.log_level.as_str());
    let json_format = config.network == super::config::Network::Mainnet;

    init_logging(level, json_format)
}

/// Logging errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to initialize logging: {0}")]
    InitFailed(String),
}

// ============================================================================
// Correlation IDs
// ============================================================================

/// Generate a unique correlation ID for operation tracing
pub fn generate_correlation_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis() as u64;
    format!("{:x}-{:04x}", millis & 0xFFFF_FFFF, rand::random::<u16>())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_serialization() {
        let event = LogEvent::new(LogLevel::Info, EventCategory::Mint, "Test event")
            .with_correlation_id("test-123")
            .with_data(serde_json::json!({"tx_id": "btc000001"}))
            .with_error("DUPLICATE_TX_ID", "seen before");

        let json = event.to_json();
        assert!(json.contains("Test event"));
        assert!(json.contains("test-123"));
        assert!(json.contains("btc000001"));
        assert!(json.contains("\"category\":\"mint\""));
        assert!(json.contains("DUPLICATE_TX_ID"));
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from("INFO"), LogLevel::Info);
        assert_eq!(LogLevel::from("warning"), LogLevel::Warn);
        assert_eq!(LogLevel::from("unknown"), LogLevel::Info);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_large_amounts_do_not_panic() {
        // u128 beyond u64 must go through the string path
        log_claim_event("ORDI", "0x00", u128::MAX, None);
        log_burn_event(Some(0), "ORDI", "0x00", u128::MAX, "avax", None);
    }

    #[test]
    fn test_correlation_id_generation() {
        let id = generate_correlation_id();
        assert!(id.contains('-'));
        assert!(!id.is_empty());
    }
}
