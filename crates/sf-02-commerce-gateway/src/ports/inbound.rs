//! Inbound Ports (Driving Ports)
//!
//! Typed catalog and order operations offered to the storefront.

use async_trait::async_trait;

use crate::domain::{
    ApiResponse, CategoryQuery, GatewayError, OrderCreateRequest, OrderRecord, ProductQuery,
};

/// Commerce API (Driving Port)
///
/// Query and order validation happen before anything is transmitted.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// `GET products`
    async fn list_products(&self, query: &ProductQuery) -> Result<ApiResponse, GatewayError>;

    /// `GET products/{id}`
    async fn get_product(&self, product_id: u64) -> Result<ApiResponse, GatewayError>;

    /// `GET products/categories`
    async fn list_categories(&self, query: &CategoryQuery) -> Result<ApiResponse, GatewayError>;

    /// `POST orders`
    ///
    /// Not idempotent: a failed call may still have created the order.
    async fn create_order(&self, order: &OrderCreateRequest) -> Result<OrderRecord, GatewayError>;
}
