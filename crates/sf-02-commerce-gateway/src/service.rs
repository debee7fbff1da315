//! # Commerce Gateway Service
//!
//! Application service implementing [`CommerceApi`] over an [`HttpTransport`].
//!
//! ## Response Mapping
//!
//! | Upstream outcome                    | Result                                   |
//! |-------------------------------------|------------------------------------------|
//! | 204                                 | `ApiResponse::NoContent`                 |
//! | 2xx, JSON content type              | `ApiResponse::Json`                      |
//! | 2xx, other content type             | `ApiResponse::Text` (logged)             |
//! | 4xx/5xx, JSON object body           | `Http` error, upstream message + body    |
//! | 4xx/5xx, anything else              | `Http` error, generic message + raw text |
//! | timeout / network / other           | `Timeout` / `Network` / `Internal`       |

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::adapters::ReqwestTransport;
use crate::domain::{
    ApiResponse, CategoryQuery, ConfigError, GatewayConfig, GatewayError, HttpMethod,
    OrderCreateRequest, OrderRecord, ProductQuery, QueryParams,
};
use crate::ports::inbound::CommerceApi;
use crate::ports::outbound::{HttpTransport, TransportError, TransportRequest, TransportResponse};

/// Characters of a response body kept in log lines
const LOG_PREVIEW_CHARS: usize = 500;

/// Commerce gateway.
///
/// Stateless per request; the transport owns the only shared resource.
pub struct CommerceGateway<T: HttpTransport> {
    api_root: String,
    transport: T,
}

impl CommerceGateway<ReqwestTransport> {
    /// Validate configuration and open the pooled `reqwest` transport.
    pub fn connect(config: &GatewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport =
            ReqwestTransport::new(config).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Self::new(config, transport)
    }
}

impl<T: HttpTransport> CommerceGateway<T> {
    /// Create a gateway over an existing transport.
    pub fn new(config: &GatewayConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let api_root = config.api_root();
        info!(api_root = %api_root, "Commerce gateway initialized");
        Ok(Self {
            api_root,
            transport,
        })
    }

    /// `{base_url}/wp-json/{api_version}`
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the transport. Later calls fail with an internal error.
    pub async fn close(&self) {
        self.transport.close().await;
    }

    /// Perform one request and normalize the outcome.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &QueryParams,
        body: Option<&B>,
    ) -> Result<ApiResponse, GatewayError> {
        let path = path.trim_start_matches('/');
        let body = match body.map(serde_json::to_value).transpose() {
            Ok(body) => body,
            Err(e) => {
                error!(method = %method, path, error = %e, "Failed to serialize request body");
                return Err(GatewayError::internal());
            }
        };

        let request = TransportRequest {
            method,
            url: format!("{}/{}", self.api_root, path),
            query: query.to_pairs(),
            body,
        };
        debug!(
            method = %method,
            path,
            params = ?request.query,
            has_body = request.body.is_some(),
            "Requesting commerce API"
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => return Err(transport_failure(method, path, e)),
        };

        if response.is_error() {
            return Err(upstream_failure(method, path, response));
        }

        if response.status == 204 {
            debug!(method = %method, path, "Received 204 No Content");
            return Ok(ApiResponse::NoContent);
        }

        if !response.is_json() {
            warn!(
                method = %method,
                path,
                content_type = %response.content_type,
                body = %preview(&response.body),
                "Unexpected content type from commerce API"
            );
            return Ok(ApiResponse::Text(response.body));
        }

        match serde_json::from_str::<Value>(&response.body) {
            Ok(value) => {
                debug!(method = %method, path, status = response.status, "Received response");
                Ok(ApiResponse::Json(value))
            }
            Err(e) => {
                error!(method = %method, path, error = %e, "Undecodable JSON from commerce API");
                Err(GatewayError::internal())
            }
        }
    }
}

fn transport_failure(method: HttpMethod, path: &str, err: TransportError) -> GatewayError {
    match err {
        TransportError::Timeout => {
            error!(method = %method, path, "Commerce request timed out");
            GatewayError::timeout()
        }
        TransportError::Network(reason) => {
            error!(method = %method, path, reason = %reason, "Commerce network error");
            GatewayError::network()
        }
        TransportError::Closed => {
            error!(method = %method, path, "Commerce transport already closed");
            GatewayError::internal()
        }
        TransportError::Other(reason) => {
            error!(method = %method, path, reason = %reason, "Unexpected commerce transport error");
            GatewayError::internal()
        }
    }
}

fn upstream_failure(method: HttpMethod, path: &str, response: TransportResponse) -> GatewayError {
    let status = response.status;
    match serde_json::from_str::<Value>(&response.body) {
        Ok(body @ Value::Object(_)) => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("No error message in response")
                .to_string();
            let code = body
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error_code");
            error!(method = %method, path, status, code, message = %message, "Commerce API error");
            GatewayError::upstream(status, &message, body)
        }
        _ => {
            error!(
                method = %method,
                path,
                status,
                body = %preview(&response.body),
                "HTTP error from commerce API"
            );
            GatewayError::http_status(status, response.body)
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(LOG_PREVIEW_CHARS).collect()
}

fn rejected(operation: &str, reason: impl std::fmt::Display) -> GatewayError {
    let reason = reason.to_string();
    warn!(operation, reason = %reason, "Rejected before transmission");
    GatewayError::validation(reason)
}

#[async_trait]
impl<T: HttpTransport> CommerceApi for CommerceGateway<T> {
    async fn list_products(&self, query: &ProductQuery) -> Result<ApiResponse, GatewayError> {
        query.validate().map_err(|e| rejected("list_products", e))?;
        let params = query.to_query();
        info!(params = ?params.to_pairs(), "Fetching products");
        self.execute::<Value>(HttpMethod::Get, "products", &params, None)
            .await
    }

    async fn get_product(&self, product_id: u64) -> Result<ApiResponse, GatewayError> {
        info!(product_id, "Fetching product");
        self.execute::<Value>(
            HttpMethod::Get,
            &format!("products/{}", product_id),
            &QueryParams::new(),
            None,
        )
        .await
    }

    async fn list_categories(&self, query: &CategoryQuery) -> Result<ApiResponse, GatewayError> {
        query.validate().map_err(|e| rejected("list_categories", e))?;
        let params = query.to_query();
        info!(params = ?params.to_pairs(), "Fetching categories");
        self.execute::<Value>(HttpMethod::Get, "products/categories", &params, None)
            .await
    }

    async fn create_order(&self, order: &OrderCreateRequest) -> Result<OrderRecord, GatewayError> {
        order.validate().map_err(|e| rejected("create_order", e))?;
        info!(line_items = order.line_items.len(), "Creating order");

        let response = self
            .execute(HttpMethod::Post, "orders", &QueryParams::new(), Some(order))
            .await?;

        let payload = match response {
            ApiResponse::Json(value @ Value::Object(_)) if value.get("id").is_some() => {
                match serde_json::from_value::<OrderRecord>(value.clone()) {
                    Ok(record) => {
                        info!(order_id = record.id, "Order created");
                        return Ok(record);
                    }
                    Err(e) => {
                        error!(error = %e, "Order response does not match the order shape");
                        value
                    }
                }
            }
            ApiResponse::Json(value) => value,
            ApiResponse::Text(text) => Value::String(text),
            ApiResponse::NoContent => Value::Null,
        };

        error!(response = %payload, "Order creation returned an unexpected response");
        Err(GatewayError::unexpected_response(
            "Order was not created or the commerce API returned an invalid response",
            payload,
        ))
    }
}
