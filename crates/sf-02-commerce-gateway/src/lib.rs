//! # Commerce Gateway (SF-02)
//!
//! Authenticated async access to the shop's commerce REST API: catalog
//! reads and guest order creation.
//!
//! ## Architecture
//!
//! ```text
//!   CommerceApi (inbound)
//!          │
//!   CommerceGateway ── validate query/order ── build URL ── strip absent params
//!          │
//!   HttpTransport (outbound) ── ReqwestTransport (pool, basic auth, timeouts)
//!          │
//!   {base_url}/wp-json/{api_version}/...
//! ```
//!
//! - **Domain Layer** (`domain/`): config, queries, order shapes, [`GatewayError`]
//! - **Ports Layer** (`ports/`): [`CommerceApi`] and [`HttpTransport`]
//! - **Adapters Layer** (`adapters/`): [`ReqwestTransport`]
//! - **Service Layer** (`service.rs`): response normalization
//!
//! ## Usage
//!
//! ```ignore
//! use sf_02_commerce_gateway::{CommerceApi, CommerceGateway, GatewayConfig, ProductQuery};
//!
//! let gateway = CommerceGateway::connect(&config)?;
//! let products = gateway.list_products(&ProductQuery::default()).await?;
//! gateway.close().await;
//! ```
//!
//! ## Failure Model
//!
//! Every failure is a [`GatewayError`]. There are no retries; `create_order`
//! is not idempotent.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::ReqwestTransport;
pub use domain::{
    Address, ApiCredentials, ApiResponse, CategoryQuery, ConfigError, ErrorKind, GatewayConfig,
    GatewayError, GatewayResult, HttpMethod, LineItem, MetaData, OrderCreateRequest, OrderRecord,
    OrderValidationError, ProductQuery, QueryError, QueryParams, SortOrder, TimeoutConfig,
    MAX_PER_PAGE,
};
pub use ports::{CommerceApi, HttpTransport, TransportError, TransportRequest, TransportResponse};
pub use service::CommerceGateway;
