//! OrdBridge - Relayer API and Demo
//!
//! Run modes:
//!   cargo run                    - Show usage
//!   cargo run -- api             - Serve the relayer read API over the stored state
//!   cargo run -- demo            - Run the V1 -> V2 walkthrough in memory

use ordbridge::api;
use ordbridge::common::{init_from_config, BridgeConfig};
use ordbridge::{
    Address, BridgeService, EntrySigner, MemoryStateStore, MemoryTokenDeployer, MintEntry,
    ProtocolVersion, SqliteStateStore, VariantMintEntry,
};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let config = match BridgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_from_config(&config) {
        eprintln!("Warning: {}", e);
    }

    match args[1].as_str() {
        "api" => run_api_server(config, &args[2..]).await,
        "demo" => run_demo(config).await,
        "help" | "--help" | "-h" => print_usage(),
        _ => print_usage(),
    }
}

fn print_usage() {
    println!("OrdBridge - BRC-20 <-> ERC20 Bridge");
    println!();
    println!("Usage:");
    println!("  ordbridge-api api [--port <port>]    Start relayer API server (default: 3002)");
    println!("  ordbridge-api demo                   Run the V1 -> V2 walkthrough");
    println!();
    println!("Environment Variables:");
    println!("  ORDBRIDGE_NETWORK     mainnet | testnet | devnet (default: devnet)");
    println!("  ORDBRIDGE_OWNER       Owner address (0x...)");
    println!("  ORDBRIDGE_SIGNERS     Comma-separated SEC1 hex public keys of entry signers");
    println!("  ORDBRIDGE_VERSION     Protocol version, 1 or 2 (default: 1)");
    println!("  ORDBRIDGE_DB_PATH     SQLite state file (default: data/ordbridge.db)");
    println!("  ORDBRIDGE_API_PORT    REST API port (default: 3002)");
    println!("  ORDBRIDGE_LOG_LEVEL   Log level (default: info)");
}

/// Start the relayer read API over the persisted state
async fn run_api_server(config: BridgeConfig, args: &[String]) {
    let mut port = config.api_port;

    // Parse arguments
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                port = args[i + 1].parse().unwrap_or(config.api_port);
                i += 2;
            }
            _ => i += 1,
        }
    }

    config.print_summary();

    let store = match SqliteStateStore::new(&config.db_path) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Failed to open state store: {}", e);
            return;
        }
    };

    let service =
        match BridgeService::open(&config, store, Box::new(MemoryTokenDeployer::default())).await {
            Ok(service) => service,
            Err(e) => {
                eprintln!("Failed to open bridge: {}", e);
                return;
            }
        };

    if let Err(e) = api::start_server(service.shared(), port).await {
        eprintln!("API server error: {}", e);
    }
}

/// V1 mint/claim/burn, upgrade, then the same flow on an x100 variant
async fn run_demo(config: BridgeConfig) {
    if let Err(e) = demo(config).await {
        eprintln!("Demo failed: {} ({})", e, e.error_code());
    }
}

async fn demo(mut config: BridgeConfig) -> ordbridge::Result<()> {
    println!("=== OrdBridge Demo ===");
    println!();

    let signer = EntrySigner::generate();
    let owner = Address::derive(b"ordbridge:demo-owner");
    let user = Address::derive(b"ordbridge:demo-user");

    config.owner = owner;
    config.signers = vec![signer.verifying_key()];
    config.version = ProtocolVersion::V1;

    let service = BridgeService::open(
        &config,
        Arc::new(MemoryStateStore::new()),
        Box::new(MemoryTokenDeployer::default()),
    )
    .await?;

    println!("Owner:  {}", owner);
    println!("User:   {}", user);
    println!("Signer: {}", signer.public_key_hex());
    println!();

    service.set_fee_recipient(owner, owner).await?;

    // V1
    println!("--- V1 ---");
    let entries = vec![MintEntry::new("ordi", 1000, user, "btc000001", 100_000_000)];
    let signatures = signer.sign_batch(&entries)?;
    service
        .execute("add_mint_entries", |bridge| {
            bridge.v1()?.add_mint_entries(&owner, &entries, &signatures)
        })
        .await?;
    println!("Credited 1000 ORDI to user (tx btc000001)");

    let claimed = service
        .execute("claim", |bridge| bridge.v1()?.claim(&user, "ordi"))
        .await?;
    println!("Claimed {} ORDI", claimed);

    let request = service
        .execute("burn_for_brc", |bridge| {
            bridge
                .v1()?
                .burn_for_brc(&user, "avax", "ordi", 1000, &user.to_string())
        })
        .await?;
    println!(
        "Burned {} {} -> queued #{} for {}",
        request.amount, request.variant, request.sequence, request.destination_chain
    );

    // Upgrade
    println!();
    println!("--- Upgrade ---");
    service.upgrade_to_v2().await?;
    {
        let bridge = service.shared();
        let bridge = bridge.read().await;
        println!("Now running {} ({})", bridge.version(), bridge.admission());
        println!("Fee recipient carried over: {}", bridge.fee_recipient());
    }

    // V2
    println!();
    println!("--- V2 ---");
    let entries = vec![VariantMintEntry::new("ordi", 100, 1000, user, "btc000002", 100_000_000)];
    service
        .execute("add_mint_entries", |bridge| {
            bridge.v2()?.add_mint_entries(&owner, &entries)
        })
        .await?;
    println!("Credited 1000 ORDI(x100) to user (tx btc000002)");

    let claimed = service
        .execute("claim", |bridge| bridge.v2()?.claim(&user, "ordi", 100))
        .await?;
    println!("Claimed {} ORDI(x100)", claimed);

    service
        .execute("burn_for_brc", |bridge| {
            bridge
                .v2()?
                .burn_for_brc(&user, "avax", "ordi", 100, 1000, &user.to_string())
        })
        .await?;

    // Relayer view
    println!();
    println!("--- Burn queue ---");
    let bridge = service.shared();
    let bridge = bridge.read().await;
    for request in bridge.get_burn_entries_to_process(10) {
        println!(
            "  #{} {} {} from {} -> {} on {}",
            request.sequence,
            request.amount,
            request.variant,
            request.wallet,
            request.destination_address,
            request.destination_chain
        );
    }

    println!();
    for variant in ["ORDI", "ORDI(x100)"] {
        if let Some(address) = bridge.token_contract(variant)? {
            println!("Token {:<11} {}", variant, address);
        }
    }

    Ok(())
}
