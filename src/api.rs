//! REST API for Relayers
//!
//! Read-only endpoints over the bridge state:
//! - GET /api/health - Health check
//! - GET /api/burns?count=N&from=S - Burn requests, oldest first
//! - GET /api/tokens/:variant - Token of a variant key (`ORDI`, `ORDI(x100)`)
//! - GET /api/claimable/:variant/:wallet - Pending claimable amount
//! - GET /api/stats - Bridge counters
//!
//! All state changes go through the bridge service, never through HTTP.
//! Amounts are returned as decimal strings.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::bridge::BridgeStats;
use crate::common::error::BridgeError;
use crate::service::SharedBridge;
use crate::types::{Address, BurnRequest, VariantKey};

/// Largest page `/api/burns` returns
pub const MAX_BURN_PAGE: usize = 500;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct BurnsQuery {
    pub count: Option<usize>,
    pub from: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct BurnEntryResponse {
    pub sequence: u64,
    pub destination_chain: String,
    pub variant: String,
    pub amount: String,
    pub destination_address: String,
    pub wallet: String,
}

impl From<BurnRequest> for BurnEntryResponse {
    fn from(request: BurnRequest) -> Self {
        Self {
            sequence: request.sequence,
            destination_chain: request.destination_chain,
            variant: request.variant.to_string(),
            amount: request.amount.to_string(),
            destination_address: request.destination_address,
            wallet: request.wallet.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BurnsResponse {
    pub total: usize,
    pub entries: Vec<BurnEntryResponse>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub variant: String,
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub max_supply: String,
    pub total_supply: String,
}

#[derive(Debug, Serialize)]
pub struct ClaimableResponse {
    pub variant: String,
    pub wallet: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub version: String,
    pub owner: String,
    pub fee_recipient: String,
    pub admission: String,
    pub tokens: usize,
    pub consumed_tx_ids: usize,
    pub pending_claims: usize,
    pub total_claimable: String,
    pub burn_requests: usize,
}

impl From<BridgeStats> for StatsResponse {
    fn from(stats: BridgeStats) -> Self {
        Self {
            version: stats.version.to_string(),
            owner: stats.owner.to_string(),
            fee_recipient: stats.fee_recipient.to_string(),
            admission: stats.admission.to_string(),
            tokens: stats.tokens,
            consumed_tx_ids: stats.consumed_tx_ids,
            pending_claims: stats.pending_claims,
            total_claimable: stats.total_claimable.to_string(),
            burn_requests: stats.burn_requests,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

fn error_response(status: StatusCode, err: &BridgeError) -> axum::response::Response {
    let response = ErrorResponse {
        error: err.error_code().to_string(),
        details: Some(err.to_string()),
    };
    (status, Json(response)).into_response()
}

// =============================================================================
// API Handlers
// =============================================================================

/// GET /api/health
async fn handle_health(State(bridge): State<SharedBridge>) -> impl IntoResponse {
    let bridge = bridge.read().await;

    Json(serde_json::json!({
        "status": "ok",
        "service": "ordbridge-api",
        "protocol": bridge.version().to_string(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /api/burns
///
/// Without `from`, returns the oldest `count` requests (the relayer's
/// processing view). With `from`, resumes at that sequence number.
async fn handle_burns(
    State(bridge): State<SharedBridge>,
    Query(query): Query<BurnsQuery>,
) -> impl IntoResponse {
    let bridge = bridge.read().await;
    let count = query.count.unwrap_or(10).min(MAX_BURN_PAGE);

    let entries = match query.from {
        Some(start) => bridge.burn_entries_from(start, count),
        None => bridge.get_burn_entries_to_process(count),
    };

    Json(BurnsResponse {
        total: bridge.burn_queue_len(),
        entries: entries.into_iter().map(BurnEntryResponse::from).collect(),
    })
}

/// GET /api/tokens/:variant
async fn handle_token(
    State(bridge): State<SharedBridge>,
    Path(variant): Path<String>,
) -> axum::response::Response {
    let key: VariantKey = match variant.parse() {
        Ok(key) => key,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let bridge = bridge.read().await;
    match bridge.token_info(&key) {
        Ok(info) => {
            let response = TokenResponse {
                variant: info.variant.to_string(),
                address: info.address.to_string(),
                name: info.name,
                symbol: info.symbol,
                decimals: info.decimals,
                max_supply: info.max_supply.to_string(),
                total_supply: info.total_supply.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e @ BridgeError::UnknownVariant(_)) => error_response(StatusCode::NOT_FOUND, &e),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

/// GET /api/claimable/:variant/:wallet
async fn handle_claimable(
    State(bridge): State<SharedBridge>,
    Path((variant, wallet)): Path<(String, String)>,
) -> axum::response::Response {
    let wallet: Address = match wallet.parse() {
        Ok(wallet) => wallet,
        Err(e) => {
            let err = BridgeError::InvalidAddress(format!("{}: {}", wallet, e));
            return error_response(StatusCode::BAD_REQUEST, &err);
        }
    };

    let key: VariantKey = match variant.parse() {
        Ok(key) => key,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e),
    };

    let bridge = bridge.read().await;
    let response = ClaimableResponse {
        amount: bridge.state().base().claimable_of(&key, &wallet).to_string(),
        variant: key.to_string(),
        wallet: wallet.to_string(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/stats
async fn handle_stats(State(bridge): State<SharedBridge>) -> impl IntoResponse {
    let bridge = bridge.read().await;
    Json(StatsResponse::from(bridge.stats()))
}

// =============================================================================
// Router Setup
// =============================================================================

/// Create the API router with all endpoints
pub fn create_router(bridge: SharedBridge) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/burns", get(handle_burns))
        .route("/api/tokens/:variant", get(handle_token))
        .route("/api/claimable/:variant/:wallet", get(handle_claimable))
        .route("/api/stats", get(handle_stats))
        .layer(cors)
        .with_state(bridge)
}

/// Start the API server
pub async fn start_server(bridge: SharedBridge, port: u16) -> Result<(), std::io::Error> {
    let app = create_router(bridge);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    println!("=== OrdBridge Relayer API ===");
    println!("Listening on http://{}", addr);
    println!();
    println!("Endpoints:");
    println!("  GET /api/burns?count=N&from=S          - Burn requests to process");
    println!("  GET /api/tokens/:variant               - Token of a variant");
    println!("  GET /api/claimable/:variant/:wallet    - Pending claimable amount");
    println!("  GET /api/stats                         - Bridge counters");
    println!("  GET /api/health                        - Health check");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

// =============================================================================
// Tests
// =============================================================================
