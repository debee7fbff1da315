//! Domain types for the Commerce Gateway.
//!
//! Configuration, query and order shapes, and the normalized error. No I/O.

pub mod catalog;
pub mod config;
pub mod error;
pub mod order;
pub mod types;

// Re-exports for convenience
pub use catalog::{CategoryQuery, ProductQuery, QueryError, SortOrder, MAX_PER_PAGE};
pub use config::{ApiCredentials, ConfigError, GatewayConfig, TimeoutConfig};
pub use error::{ErrorKind, GatewayError, GatewayResult};
pub use order::{
    Address, LineItem, MetaData, OrderCreateRequest, OrderRecord, OrderValidationError,
};
pub use types::{ApiResponse, HttpMethod, QueryParams};
