//! # Integration Test Flows
//!
//! Session authentication (sf-01) feeding order creation through the
//! commerce gateway (sf-02), wired by the runtime container.
//!
//! ## Flow Tested:
//!
//! 1. **Signed payload → IdentityContext**: verified against the bot token
//! 2. **IdentityContext → OrderCreateRequest**: user attribution metadata
//! 3. **OrderCreateRequest → OrderRecord**: through a recording transport
//! 4. **Shutdown**: transport released, later calls fail

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::{SystemTime, UNIX_EPOCH};

    use parking_lot::Mutex;
    use serde_json::{json, Value};

    use sf_01_session_auth::{sign_fields, IdentityError, SigningSecret, Verdict};
    use sf_02_commerce_gateway::{
        ApiCredentials, CommerceApi, ErrorKind, HttpMethod, HttpTransport, LineItem,
        OrderCreateRequest, TransportError, TransportRequest, TransportResponse,
    };
    use sf_runtime::attribution::{META_START_PARAM, META_USERNAME, META_USER_ID};
    use sf_runtime::{StorefrontConfig, StorefrontError, StorefrontRuntime};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const BOT_TOKEN: &str = "987654:integration-token";
    const USER_JSON: &str =
        r#"{"id":5550001,"first_name":"Dana","last_name":"Reyes","username":"dreyes"}"#;

    /// Records requests and replays scripted responses
    #[derive(Default)]
    struct MockTransport {
        requests: Mutex<Vec<TransportRequest>>,
        script: Mutex<VecDeque<TransportResponse>>,
        closed: Mutex<bool>,
    }

    impl MockTransport {
        fn replying(status: u16, body: Value) -> Self {
            let transport = Self::default();
            transport.script.lock().push_back(TransportResponse {
                status,
                content_type: "application/json; charset=UTF-8".to_string(),
                body: body.to_string(),
            });
            transport
        }
    }

    #[async_trait::async_trait]
    impl HttpTransport for MockTransport {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            if *self.closed.lock() {
                return Err(TransportError::Closed);
            }
            self.requests.lock().push(request);
            self.script
                .lock()
                .pop_front()
                .ok_or_else(|| TransportError::Other("no scripted response".into()))
        }

        async fn close(&self) {
            *self.closed.lock() = true;
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap()
    }

    fn config() -> StorefrontConfig {
        let mut config = StorefrontConfig::default();
        config.gateway.base_url = "https://shop.example.com".to_string();
        config.gateway.credentials = ApiCredentials::new("ck_test", "cs_test");
        config.bot_token = SigningSecret::new(BOT_TOKEN);
        config
    }

    fn signed_session(auth_date: i64, token: &str) -> String {
        let auth_date = auth_date.to_string();
        sign_fields(
            &[
                ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
                ("user", USER_JSON),
                ("auth_date", &auth_date),
                ("start_param", "spring-sale"),
            ],
            &SigningSecret::new(token),
        )
        .unwrap()
    }

    fn runtime(transport: MockTransport) -> StorefrontRuntime<MockTransport> {
        StorefrontRuntime::with_transport(&config(), transport).unwrap()
    }

    fn order() -> OrderCreateRequest {
        OrderCreateRequest::new(vec![LineItem::new(93, 2), LineItem::new(22, 1).variation(23)])
            .note("Call before delivery")
    }

    // =============================================================================
    // INTEGRATION TESTS: SESSION AUTH → ORDER CREATION
    // =============================================================================

    #[tokio::test]
    async fn test_authenticated_order_is_attributed_and_created() {
        let runtime = runtime(MockTransport::replying(
            201,
            json!({"id": 4021, "status": "on-hold", "currency": "EUR", "total": "41.80"}),
        ));

        let record = runtime
            .place_order(&signed_session(now(), BOT_TOKEN), order())
            .await
            .unwrap();
        assert_eq!(record.id, 4021);
        assert_eq!(record.total.as_deref(), Some("41.80"));

        let gateway = runtime.gateway();
        let requests = gateway.transport().requests.lock().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(
            requests[0].url,
            "https://shop.example.com/wp-json/wc/v3/orders"
        );

        let body = requests[0].body.clone().unwrap();
        assert_eq!(body["status"], "on-hold");
        assert_eq!(body["customer_id"], 0);
        assert_eq!(body["customer_note"], "Call before delivery");
        assert_eq!(body["line_items"][1]["variation_id"], 23);
        assert_eq!(body["billing"]["first_name"], "Dana");
        assert_eq!(body["billing"]["last_name"], "Reyes");
        assert_eq!(
            body["meta_data"],
            json!([
                {"key": META_USER_ID, "value": 5550001},
                {"key": META_USERNAME, "value": "dreyes"},
                {"key": META_START_PARAM, "value": "spring-sale"},
            ])
        );
    }

    #[tokio::test]
    async fn test_forged_session_never_reaches_gateway() {
        let runtime = runtime(MockTransport::default());

        let result = runtime
            .place_order(&signed_session(now(), "111:other-bot"), order())
            .await;
        assert!(matches!(
            result,
            Err(StorefrontError::Identity(IdentityError::InvalidSignature))
        ));
        assert!(runtime.gateway().transport().requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_stale_session_reported_as_expired() {
        let runtime = runtime(MockTransport::default());

        let result = runtime
            .place_order(&signed_session(now() - 7_200, BOT_TOKEN), order())
            .await;
        match result {
            Err(StorefrontError::Identity(IdentityError::Expired { age_secs })) => {
                assert!(age_secs >= 7_200);
            }
            other => panic!("expected expired session, got {:?}", other),
        }
    }

    #[test]
    fn test_verdict_keeps_claims_of_stale_session() {
        let runtime = runtime(MockTransport::default());
        let authenticator = runtime.authenticator();

        let verdict = sf_01_session_auth::SessionAuthApi::validate(
            authenticator.as_ref(),
            &signed_session(now() - 7_200, BOT_TOKEN),
        );
        assert!(matches!(verdict, Verdict::Rejected { .. }));
        assert!(verdict.rejection().unwrap().is_expired());

        let (ok, claims) = verdict.into_parts();
        assert!(!ok);
        assert_eq!(claims.unwrap().user().unwrap().id, 5550001);
    }

    #[tokio::test]
    async fn test_invalid_line_item_rejected_after_authentication() {
        let runtime = runtime(MockTransport::default());
        let order = OrderCreateRequest::new(vec![LineItem::new(93, 0)]);

        let result = runtime
            .place_order(&signed_session(now(), BOT_TOKEN), order)
            .await;
        match result {
            Err(StorefrontError::Gateway(err)) => {
                assert_eq!(err.kind, ErrorKind::Validation);
                assert_eq!(err.status_code, None);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(runtime.gateway().transport().requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_rejection_surfaces_as_gateway_error() {
        let runtime = runtime(MockTransport::replying(
            400,
            json!({
                "code": "woocommerce_rest_invalid_product_id",
                "message": "Product ID 93 is invalid.",
                "data": {"status": 400}
            }),
        ));

        let result = runtime
            .place_order(&signed_session(now(), BOT_TOKEN), order())
            .await;
        match result {
            Err(StorefrontError::Gateway(err)) => {
                assert_eq!(err.status_code, Some(400));
                assert_eq!(err.message, "Commerce API error: Product ID 93 is invalid.");
                assert_eq!(err.upstream_code(), Some("woocommerce_rest_invalid_product_id"));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_releases_transport() {
        let runtime = runtime(MockTransport::default());
        let mut signal = runtime.shutdown_signal();
        assert!(!runtime.is_shut_down());

        runtime.shutdown().await;

        assert!(runtime.is_shut_down());
        assert!(signal.has_changed().unwrap());
        assert!(*signal.borrow_and_update());

        let err = runtime.gateway().get_product(93).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.status_code, None);
    }

    #[tokio::test]
    async fn test_failed_signal_source_still_shuts_down() {
        let runtime = runtime(MockTransport::default());

        runtime
            .run_until(async {
                Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "signal handler unavailable",
                ))
            })
            .await;

        assert!(runtime.is_shut_down());
        assert!(*runtime.gateway().transport().closed.lock());
    }
}
