//! # Transport Integration Tests
//!
//! Drives `CommerceGateway<ReqwestTransport>` against a loopback socket that
//! speaks just enough HTTP/1.1 to capture the request and play back a reply.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use sf_02_commerce_gateway::{
        ApiCredentials, ApiResponse, CommerceApi, CommerceGateway, ErrorKind, GatewayConfig,
        HttpMethod, LineItem, OrderCreateRequest, ProductQuery, QueryParams, ReqwestTransport,
        TimeoutConfig,
    };

    // =============================================================================
    // LOOPBACK SERVER
    // =============================================================================

    /// Accept one connection, capture the request, write `response`.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{}", addr), handle)
    }

    /// Accept one connection and never answer.
    async fn serve_silence() -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_subslice(&buf, b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                if buf.len() >= end + 4 + content_length(&head) {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    fn content_length(head: &str) -> usize {
        header(head, "content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Header value by case-insensitive name.
    fn header<'a>(request: &'a str, name: &str) -> Option<&'a str> {
        request.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    fn request_line(request: &str) -> &str {
        request.lines().next().unwrap_or_default()
    }

    fn request_body(request: &str) -> &str {
        request
            .split_once("\r\n\r\n")
            .map(|(_, body)| body)
            .unwrap_or_default()
    }

    fn http_response(status: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        )
    }

    fn gateway_for(base_url: &str, timeouts: TimeoutConfig) -> CommerceGateway<ReqwestTransport> {
        let config = GatewayConfig {
            base_url: base_url.to_string(),
            credentials: ApiCredentials::new("ck_test", "cs_test"),
            timeouts,
            ..GatewayConfig::default()
        };
        CommerceGateway::connect(&config).unwrap()
    }

    fn gateway(base_url: &str) -> CommerceGateway<ReqwestTransport> {
        gateway_for(base_url, TimeoutConfig::default())
    }

    // =============================================================================
    // REQUEST SHAPE
    // =============================================================================

    #[tokio::test]
    async fn test_basic_auth_and_query_on_the_wire() {
        let (base_url, server) = serve_once(http_response(
            "200 OK",
            "application/json; charset=UTF-8",
            r#"[{"id":1}]"#,
        ))
        .await;

        let response = gateway(&base_url)
            .list_products(&ProductQuery::default().search("tea cup"))
            .await
            .unwrap();
        assert_eq!(response.as_json().unwrap()[0]["id"], 1);

        let request = server.await.unwrap();
        let line = request_line(&request);
        assert!(line.starts_with("GET /wp-json/wc/v3/products?"), "{line}");
        assert!(line.contains("page=1"));
        assert!(line.contains("per_page=10"));
        assert!(line.contains("status=publish"));
        assert!(line.contains("search=tea+cup"));
        assert!(!line.contains("category="));
        assert!(!line.contains("featured="));
        // base64("ck_test:cs_test")
        assert_eq!(
            header(&request, "authorization"),
            Some("Basic Y2tfdGVzdDpjc190ZXN0")
        );
    }

    #[tokio::test]
    async fn test_order_body_is_json() {
        let (base_url, server) = serve_once(http_response(
            "201 Created",
            "application/json",
            r#"{"id":88,"status":"on-hold"}"#,
        ))
        .await;

        let order = OrderCreateRequest::new(vec![LineItem::new(5, 3)]).meta("source", "chat");
        let record = gateway(&base_url).create_order(&order).await.unwrap();
        assert_eq!(record.id, 88);

        let request = server.await.unwrap();
        assert!(request_line(&request).starts_with("POST /wp-json/wc/v3/orders "));
        assert!(header(&request, "content-type")
            .unwrap()
            .starts_with("application/json"));
        let body: Value = serde_json::from_str(request_body(&request)).unwrap();
        assert_eq!(body["payment_method"], "cod");
        assert_eq!(body["set_paid"], false);
        assert_eq!(body["line_items"][0]["quantity"], 3);
        assert!(body.get("billing").is_none());
    }

    // =============================================================================
    // RESPONSE MAPPING
    // =============================================================================

    #[tokio::test]
    async fn test_structured_not_found() {
        let (base_url, server) = serve_once(http_response(
            "404 Not Found",
            "application/json",
            r#"{"code":"woocommerce_rest_product_invalid_id","message":"Invalid ID.","data":{"status":404}}"#,
        ))
        .await;

        let err = gateway(&base_url).get_product(424242).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Http);
        assert_eq!(err.status_code, Some(404));
        assert_eq!(err.message, "Commerce API error: Invalid ID.");
        assert_eq!(err.details.as_ref().unwrap()["data"]["status"], 404);
        assert!(err.is_not_found());

        let request = server.await.unwrap();
        assert!(request_line(&request).starts_with("GET /wp-json/wc/v3/products/424242 "));
    }

    #[tokio::test]
    async fn test_unstructured_server_error() {
        let (base_url, _server) = serve_once(http_response(
            "500 Internal Server Error",
            "text/html",
            "<b>Fatal error</b>",
        ))
        .await;

        let err = gateway(&base_url).get_product(1).await.unwrap_err();
        assert_eq!(err.status_code, Some(500));
        assert_eq!(err.message, "HTTP error 500 from commerce API");
        assert_eq!(err.details, Some(Value::String("<b>Fatal error</b>".into())));
    }

    #[tokio::test]
    async fn test_no_content() {
        let (base_url, _server) = serve_once(
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;

        let response = gateway(&base_url)
            .execute::<Value>(HttpMethod::Delete, "products/9", &QueryParams::new(), None)
            .await
            .unwrap();
        assert_eq!(response, ApiResponse::NoContent);
    }

    #[tokio::test]
    async fn test_non_json_success_returned_as_text() {
        let (base_url, _server) =
            serve_once(http_response("200 OK", "text/plain", "under maintenance")).await;

        let response = gateway(&base_url).get_product(1).await.unwrap();
        assert_eq!(response, ApiResponse::Text("under maintenance".into()));
    }

    // =============================================================================
    // TRANSPORT FAILURES
    // =============================================================================

    #[tokio::test]
    async fn test_silent_upstream_times_out() {
        let (base_url, server) = serve_silence().await;
        let timeouts = TimeoutConfig {
            connect: Duration::from_millis(500),
            read: Duration::from_millis(300),
            total: Duration::from_millis(300),
        };

        let err = gateway_for(&base_url, timeouts)
            .get_product(1)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.status_code, None);
        server.abort();
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = gateway(&format!("http://{}", addr))
            .get_product(1)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.status_code, None);
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_closed_gateway_is_internal_error() {
        let gateway = gateway("http://127.0.0.1:9");
        gateway.close().await;
        assert!(gateway.transport().is_closed());

        let err = gateway.get_product(1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }
}
