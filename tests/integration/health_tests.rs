//! Health aggregation over real HTTP

#[cfg(test)]
mod tests {
    use crate::common::{UNREACHABLE_URL, client_for};
    use serde_json::json;
    use service_gateway::core::health::{HealthAggregator, OverallStatus, ServiceStatus};
    use service_gateway::core::services::ServiceName;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn healthy_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_settles_all_probes_with_one_failure() {
        let auth = healthy_server().await;
        let chat = healthy_server().await;

        let clients = vec![
            client_for(ServiceName::Auth, &auth.uri()),
            client_for(ServiceName::Report, UNREACHABLE_URL),
            client_for(ServiceName::Chat, &chat.uri()),
        ];
        let health = HealthAggregator::default().check_system_health(&clients).await;

        assert_eq!(health.status, OverallStatus::Degraded);
        assert_eq!(health.services.len(), 3);
        assert_eq!(health.services[0].status, ServiceStatus::Healthy);
        assert_eq!(health.services[1].status, ServiceStatus::Unhealthy);
        assert!(health.services[1].error.is_some());
        assert_eq!(health.services[2].status, ServiceStatus::Healthy);
    }

    #[tokio::test]
    async fn test_all_healthy() {
        let server = healthy_server().await;
        let clients = vec![
            client_for(ServiceName::Auth, &server.uri()),
            client_for(ServiceName::User, &server.uri()),
            client_for(ServiceName::Blog, &server.uri()),
        ];

        let health = HealthAggregator::default().check_system_health(&clients).await;
        assert_eq!(health.status, OverallStatus::Healthy);
        assert!(health.services.iter().all(|r| r.response_time.is_some()));
    }

    #[tokio::test]
    async fn test_slow_service_bounded_by_probe_timeout() {
        let slow = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&slow)
            .await;
        let fast = healthy_server().await;

        let clients = vec![
            client_for(ServiceName::Auth, &fast.uri()),
            client_for(ServiceName::User, &slow.uri()),
        ];

        let started = Instant::now();
        let health = HealthAggregator::new(Duration::from_millis(300))
            .check_system_health(&clients)
            .await;

        assert!(started.elapsed() < Duration::from_secs(3));
        assert_eq!(health.services[0].status, ServiceStatus::Healthy);
        assert_eq!(health.services[1].status, ServiceStatus::Unhealthy);
        assert_eq!(
            health.services[1].error.as_deref(),
            Some("Network error calling user-service: timed out after 300ms")
        );
    }

    #[tokio::test]
    async fn test_non_2xx_health_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "db down"})))
            .mount(&server)
            .await;

        let clients = vec![client_for(ServiceName::Report, &server.uri())];
        let health = HealthAggregator::default().check_system_health(&clients).await;

        assert_eq!(health.status, OverallStatus::Degraded);
        assert_eq!(
            health.services[0].error.as_deref(),
            Some("report-service responded with status 503: db down")
        );
    }
}
