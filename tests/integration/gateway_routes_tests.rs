//! Gateway endpoint tests through the full actix application

#[cfg(test)]
mod tests {
    use crate::common::{UNREACHABLE_URL, app_state, config_for, override_url};
    use actix_web::test;
    use serde_json::{Value, json};
    use service_gateway::core::services::ServiceName;
    use service_gateway::server::server::HttpServer;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_health(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(server)
            .await;
    }

    // ==================== Health ====================

    #[actix_web::test]
    async fn test_health_reports_every_service() {
        let server = MockServer::start().await;
        mock_health(&server).await;

        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        let services = body["services"].as_array().unwrap();
        assert_eq!(services.len(), ServiceName::ALL.len());
        assert_eq!(services[0]["service"], "auth-service");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_health_is_200_when_degraded() {
        let server = MockServer::start().await;
        mock_health(&server).await;
        let mut config = config_for(&server);
        override_url(&mut config.gateway.services, ServiceName::Chat, UNREACHABLE_URL);

        let app = test::init_service(HttpServer::create_app(app_state(config))).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "degraded");
        let chat = body["services"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["service"] == "chat-service")
            .unwrap();
        assert_eq!(chat["status"], "unhealthy");
        assert!(chat["error"].is_string());
    }

    #[actix_web::test]
    async fn test_detailed_health_adds_metadata() {
        let server = MockServer::start().await;
        mock_health(&server).await;

        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;
        let req = test::TestRequest::get().uri("/health/detailed").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["environment"], "development");
        assert!(body["uptime"].is_u64());
        assert!(body["memory"]["rss"].as_u64().unwrap() > 0);
        assert!(body["memory"]["rss"].as_u64() < body["memory"]["hostTotal"].as_u64());
        assert_eq!(body["features"]["reverseProxy"], true);
        assert_eq!(body["breakers"]["booking-service"]["state"], "CLOSED");
    }

    // ==================== Token verification ====================

    #[actix_web::test]
    async fn test_verify_relays_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/verify"))
            .and(header("authorization", "Bearer good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"userId": "u1"})))
            .expect(1)
            .mount(&server)
            .await;

        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;
        let req = test::TestRequest::post()
            .uri("/auth/verify")
            .insert_header(("Authorization", "Bearer good"))
            .insert_header(("Cookie", "session=1"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({"success": true, "data": {"userId": "u1"}}));
        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("cookie").is_none());
        assert!(requests[0].headers.get("x-request-id").is_some());
    }

    #[actix_web::test]
    async fn test_verify_passes_through_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/verify"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid token"})),
            )
            .mount(&server)
            .await;

        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;
        let req = test::TestRequest::post()
            .uri("/auth/verify")
            .insert_header(("Authorization", "Bearer bad"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 401);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
        assert_eq!(
            body["error"]["message"],
            "auth-service responded with status 401: Invalid token"
        );
    }

    #[actix_web::test]
    async fn test_verify_with_auth_down_is_502() {
        let server = MockServer::start().await;
        let mut config = config_for(&server);
        override_url(&mut config.gateway.services, ServiceName::Auth, UNREACHABLE_URL);

        let app = test::init_service(HttpServer::create_app(app_state(config))).await;
        let req = test::TestRequest::post().uri("/auth/verify").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 502);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "NETWORK_ERROR");
    }

    // ==================== Ambient headers ====================

    #[actix_web::test]
    async fn test_request_id_and_server_headers() {
        let server = MockServer::start().await;
        mock_health(&server).await;

        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;
        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("x-request-id", "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
        assert_eq!(resp.headers().get("server").unwrap(), "service-gateway");
    }
}
