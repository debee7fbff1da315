//! `reqwest`-backed [`HttpTransport`].
//!
//! Holds one pooled client for the lifetime of the gateway. Credentials are
//! attached as HTTP basic auth on every request.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{header, Client, Method};
use tracing::{debug, info};

use crate::domain::{ApiCredentials, GatewayConfig, HttpMethod, TimeoutConfig};
use crate::ports::outbound::{HttpTransport, TransportError, TransportRequest, TransportResponse};

/// Pooled HTTP transport
pub struct ReqwestTransport {
    client: RwLock<Option<Client>>,
    credentials: ApiCredentials,
    timeouts: TimeoutConfig,
}

impl ReqwestTransport {
    /// Build the client from gateway configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.timeouts.connect)
            .read_timeout(config.timeouts.read)
            .timeout(config.timeouts.total)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self {
            client: RwLock::new(Some(client)),
            credentials: config.credentials.clone(),
            timeouts: config.timeouts,
        })
    }

    /// Whether [`HttpTransport::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }

    fn client(&self) -> Result<Client, TransportError> {
        self.client.read().clone().ok_or(TransportError::Closed)
    }

    async fn dispatch(
        &self,
        client: Client,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = client
            .request(method_of(request.method), &request.url)
            .basic_auth(&self.credentials.key, Some(&self.credentials.secret));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.map_err(classify)?;

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let client = self.client()?;
        debug!(method = %request.method, url = %request.url, "Sending commerce request");

        match tokio::time::timeout(self.timeouts.total, self.dispatch(client, request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }

    async fn close(&self) {
        if self.client.write().take().is_some() {
            info!("Commerce HTTP client closed");
        }
    }
}

fn method_of(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() || e.is_request() || e.is_body() {
        TransportError::Network(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}
