//! Bridge Service
//!
//! Runs bridge operations one at a time and persists the state after each
//! one that commits.
//!
//! Every mutation takes the write lock for its whole duration, including
//! the snapshot write, so operations are applied and stored in the order
//! they were issued. A rejected operation never reaches the store, and an
//! operation whose snapshot cannot be written is rolled back: memory never
//! runs ahead of storage.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::Instrument;

use crate::auth::SignerSetPolicy;
use crate::bridge::OrdBridge;
use crate::common::config::BridgeConfig;
use crate::common::error::{BridgeError, Result};
use crate::common::logging::generate_correlation_id;
use crate::state::{BridgeSnapshot, ProtocolVersion};
use crate::storage::StateStore;
use crate::token::TokenDeployer;
use crate::types::Address;

/// Bridge shared between the service and the read API
pub type SharedBridge = Arc<RwLock<OrdBridge>>;

/// Serialized, persisted access to the bridge
pub struct BridgeService {
    bridge: SharedBridge,
    store: Arc<dyn StateStore>,
}

impl BridgeService {
    /// Create a new service over an attached bridge
    pub fn new(bridge: OrdBridge, store: Arc<dyn StateStore>) -> Self {
        Self {
            bridge: Arc::new(RwLock::new(bridge)),
            store,
        }
    }

    /// Load the stored state, or deploy a fresh V1 bridge if there is none.
    ///
    /// A stored V1 state is upgraded when the config asks for V2. A stored
    /// V2 state cannot be run as V1.
    pub async fn open(
        config: &BridgeConfig,
        store: Arc<dyn StateStore>,
        deployer: Box<dyn TokenDeployer>,
    ) -> Result<Self> {
        let signers: SignerSetPolicy = config.signer_policy();

        let (mut bridge, fresh) = match store.load().await? {
            Some(snapshot) => (OrdBridge::from_snapshot(snapshot, signers, deployer)?, false),
            None => (OrdBridge::deploy_v1(config.owner, signers, deployer), true),
        };

        if bridge.version() > config.version {
            return Err(BridgeError::WrongVersion {
                expected: config.version,
                actual: bridge.version(),
            });
        }

        let upgraded = bridge.version() < config.version;
        if upgraded {
            bridge.upgrade_to_v2()?;
        }

        if fresh || upgraded {
            store.save(&bridge.snapshot()?).await?;
        }

        tracing::info!(
            target: "ordbridge::upgrade",
            version = %bridge.version(),
            fresh,
            upgraded,
            "Bridge opened"
        );

        Ok(Self::new(bridge, store))
    }

    /// Handle for read-only consumers
    pub fn shared(&self) -> SharedBridge {
        Arc::clone(&self.bridge)
    }

    /// Run one state-changing operation and persist the result.
    ///
    /// On failure, of the operation or of the snapshot write, the bridge is
    /// put back exactly as it was before the call.
    pub async fn execute<T, F>(&self, operation: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut OrdBridge) -> Result<T>,
    {
        let correlation_id = generate_correlation_id();
        let span = tracing::info_span!("bridge_op", op = operation, id = %correlation_id);

        async {
            let mut bridge = self.bridge.write().await;
            let checkpoint = bridge.snapshot()?;

            let output = match op(&mut *bridge) {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!(
                        target: "ordbridge::service",
                        code = e.error_code(),
                        error = %e,
                        "Operation rejected"
                    );
                    roll_back(&mut bridge, checkpoint);
                    return Err(e);
                }
            };

            if let Err(e) = self.persist(&bridge).await {
                tracing::error!(
                    target: "ordbridge::service",
                    code = e.error_code(),
                    error = %e,
                    "Snapshot write failed, rolling back"
                );
                roll_back(&mut bridge, checkpoint);
                return Err(e);
            }

            tracing::debug!(target: "ordbridge::service", "Operation committed");
            Ok(output)
        }
        .instrument(span)
        .await
    }

    async fn persist(&self, bridge: &OrdBridge) -> Result<()> {
        let snapshot = bridge.snapshot()?;
        self.store.save(&snapshot).await?;
        Ok(())
    }

    /// Upgrade to V2 and persist the migrated state
    pub async fn upgrade_to_v2(&self) -> Result<()> {
        self.execute("upgrade_to_v2", |bridge| bridge.upgrade_to_v2())
            .await
    }

    /// Set the fee recipient (owner only)
    pub async fn set_fee_recipient(&self, caller: Address, recipient: Address) -> Result<()> {
        self.execute("set_fee_recipient", |bridge| {
            bridge.set_fee_recipient(&caller, recipient)
        })
        .await
    }

    pub async fn version(&self) -> ProtocolVersion {
        self.bridge.read().await.version()
    }
}

fn roll_back(bridge: &mut OrdBridge, checkpoint: BridgeSnapshot) {
    if let Err(e) = bridge.restore(checkpoint) {
        tracing::error!(
            target: "ordbridge::service",
            error = %e,
            "Rollback failed"
        );
    }
}
