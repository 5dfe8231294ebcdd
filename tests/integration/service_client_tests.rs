//! Service client tests against a mock downstream

#[cfg(test)]
mod tests {
    use crate::common::{UNREACHABLE_URL, client_for};
    use serde_json::{Value, json};
    use service_gateway::core::client::{RequestOptions, normalize_headers};
    use service_gateway::core::services::ServiceName;
    use service_gateway::utils::error::{CircuitState, ServiceCallError};
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ==================== Successful calls ====================

    #[tokio::test]
    async fn test_get_returns_parsed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/1"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(ServiceName::User, &server.uri());
        let body = client.get("/api/users/1", RequestOptions::new()).await.unwrap();
        assert_eq!(body, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bookings"))
            .and(body_json(json!({"slot": "09:00"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "b1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(ServiceName::Booking, &server.uri());
        let body = client
            .post("/api/bookings", json!({"slot": "09:00"}), RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(body["id"], "b1");
    }

    #[tokio::test]
    async fn test_empty_and_text_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/blog/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let client = client_for(ServiceName::Blog, &server.uri());
        assert_eq!(
            client.delete("/api/blog/1", RequestOptions::new()).await.unwrap(),
            Value::Null
        );
        assert_eq!(
            client.get("/ping", RequestOptions::new()).await.unwrap(),
            json!("pong")
        );
    }

    // ==================== Header policy ====================

    #[tokio::test]
    async fn test_forward_sends_only_whitelisted_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .and(header("x-request-id", "r1"))
            .and(header("authorization", "Bearer t"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(ServiceName::User, &server.uri());
        let original = normalize_headers([
            ("X-Request-Id", "r1"),
            ("Authorization", "Bearer t"),
            ("Cookie", "s=1"),
            ("X-Custom", "y"),
        ]);
        client
            .forward("/api/users/me", &original, RequestOptions::new())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("cookie").is_none());
        assert!(requests[0].headers.get("x-custom").is_none());
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_non_2xx_uses_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/404"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "User not found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users/500"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(ServiceName::User, &server.uri());

        let error = client
            .get("/api/users/404", RequestOptions::new())
            .await
            .unwrap_err();
        assert_eq!(
            error,
            ServiceCallError::http("user-service", 404, "User not found")
        );

        let error = client
            .get("/api/users/500", RequestOptions::new())
            .await
            .unwrap_err();
        assert_eq!(
            error,
            ServiceCallError::http("user-service", 500, "Request failed with status code 500")
        );
    }

    #[tokio::test]
    async fn test_request_timeout_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = client_for(ServiceName::Report, &server.uri());
        let error = client
            .get(
                "/slow",
                RequestOptions::new().timeout(Duration::from_millis(200)),
            )
            .await
            .unwrap_err();

        assert!(error.is_timeout());
        assert_eq!(
            error.to_string(),
            "Network error calling report-service: timed out after 200ms"
        );
        assert_eq!(client.breaker().metrics().failure_count, 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = client_for(ServiceName::Chat, UNREACHABLE_URL);
        let error = client.get("/health", RequestOptions::new()).await.unwrap_err();

        assert!(matches!(error, ServiceCallError::Network { timed_out: false, .. }));
        assert_eq!(error.service(), "chat-service");
    }

    #[tokio::test]
    async fn test_breaker_stops_calling_failing_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .expect(20)
            .mount(&server)
            .await;

        let client = client_for(ServiceName::Appointment, &server.uri());
        for _ in 0..20 {
            assert!(client.get("/health", RequestOptions::new()).await.is_err());
        }
        assert_eq!(client.breaker().state(), CircuitState::Open);

        let error = client.get("/health", RequestOptions::new()).await.unwrap_err();
        assert_eq!(error, ServiceCallError::circuit_open("appointment-service"));
    }
}
