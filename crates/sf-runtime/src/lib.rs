//! # Storefront Runtime
//!
//! Wires the Session Authenticator (sf-01) and the Commerce Gateway (sf-02)
//! into one process.
//!
//! ## Modules
//!
//! - `config` - Environment-driven configuration with production checks
//! - `runtime` - Runtime container owning both subsystems
//! - `attribution` - Tags orders with the authenticated session user
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Install logging (`RUST_LOG`, falling back to `LOGGING_LEVEL`)
//! 3. Warn about placeholder settings
//! 4. Open the gateway connection pool
//! 5. Wait for Ctrl+C, then release the pool

pub mod attribution;
pub mod config;
pub mod runtime;

pub use attribution::attribute_order;
pub use config::{ConfigError, StorefrontConfig};
pub use runtime::{StorefrontError, StorefrontRuntime};
