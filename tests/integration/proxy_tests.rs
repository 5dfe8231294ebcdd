//! Reverse proxy tests through the full actix application

#[cfg(test)]
mod tests {
    use crate::common::{UNREACHABLE_URL, app_state, config_for, override_url};
    use actix_web::test;
    use serde_json::{Value, json};
    use service_gateway::core::services::ServiceName;
    use service_gateway::server::server::HttpServer;
    use std::time::Duration;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[actix_web::test]
    async fn test_forwards_method_path_query_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/42"))
            .and(query_param("notify", "true"))
            .and(header("authorization", "Bearer t"))
            .and(body_string(r#"{"name":"Ada"}"#))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("x-upstream", "users")
                    .set_body_json(json!({"updated": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;
        let req = test::TestRequest::put()
            .uri("/api/users/42?notify=true")
            .insert_header(("Authorization", "Bearer t"))
            .insert_header(("Content-Type", "application/json"))
            .set_payload(r#"{"name":"Ada"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 202);
        assert_eq!(resp.headers().get("x-upstream").unwrap(), "users");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"updated": true}));
    }

    #[actix_web::test]
    async fn test_upstream_errors_pass_through_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blog/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such post"))
            .mount(&server)
            .await;

        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;
        let req = test::TestRequest::get().uri("/api/blog/missing").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 404);
        let body = test::read_body(resp).await;
        assert_eq!(body, "no such post");
    }

    #[actix_web::test]
    async fn test_proxy_never_trips_the_breaker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reports/1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(25)
            .mount(&server)
            .await;

        let state = app_state(config_for(&server));
        let app = test::init_service(HttpServer::create_app(state.clone())).await;
        for _ in 0..25 {
            let req = test::TestRequest::get().uri("/api/reports/1").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 500);
        }

        let report = state.registry.get(ServiceName::Report).unwrap();
        assert_eq!(report.breaker().metrics().request_count, 0);
    }

    #[actix_web::test]
    async fn test_appends_peer_to_forwarded_for() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chat/rooms"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;
        let req = test::TestRequest::get()
            .uri("/api/chat/rooms")
            .peer_addr("10.1.2.3:5555".parse().unwrap())
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .insert_header(("Connection", "keep-alive"))
            .to_request();
        test::call_service(&app, req).await;

        let requests = server.received_requests().await.unwrap();
        assert_eq!(
            requests[0].headers.get("x-forwarded-for").unwrap(),
            "203.0.113.7, 10.1.2.3"
        );
        assert!(requests[0].headers.get("x-request-id").is_some());
    }

    #[actix_web::test]
    async fn test_unmatched_path_is_404() {
        let server = MockServer::start().await;
        let app = test::init_service(HttpServer::create_app(app_state(config_for(&server)))).await;

        for uri in ["/nope", "/api/usersettings", "/api"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status().as_u16(), 404, "{}", uri);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"]["code"], "NOT_FOUND");
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_unreachable_upstream_is_502() {
        let server = MockServer::start().await;
        let mut config = config_for(&server);
        override_url(&mut config.gateway.services, ServiceName::Booking, UNREACHABLE_URL);

        let app = test::init_service(HttpServer::create_app(app_state(config))).await;
        let req = test::TestRequest::get().uri("/api/bookings").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 502);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "BAD_GATEWAY");
    }

    #[actix_web::test]
    async fn test_slow_upstream_is_504() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appointments"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.gateway.server.proxy_timeout_ms = 200;

        let app = test::init_service(HttpServer::create_app(app_state(config))).await;
        let req = test::TestRequest::get().uri("/api/appointments").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status().as_u16(), 504);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "GATEWAY_TIMEOUT");
    }
}
