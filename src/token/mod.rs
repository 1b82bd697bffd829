//! Wrapped Token Module
//!
//! The token capability the bridge drives, the deployer that creates
//! tokens, and the factory that keeps one token per variant key.

pub mod capability;
pub mod deployer;
pub mod factory;

pub use capability::{TokenCapability, TokenError, WrappedToken};
pub use deployer::{MemoryTokenDeployer, TokenDeployer, TokenSpec};
pub use factory::TokenFactory;
