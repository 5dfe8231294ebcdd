//! Error handling integration tests
//!
//! Service-call failures surface through `GatewayError` with a status that
//! reflects where the failure happened.

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use actix_web::body::MessageBody;
    use service_gateway::utils::error::{ErrorResponse, GatewayError, ServiceCallError};
    use std::time::Duration;

    fn status_of(error: ServiceCallError) -> u16 {
        GatewayError::from(error).error_response().status().as_u16()
    }

    #[test]
    fn test_service_errors_map_to_statuses() {
        assert_eq!(status_of(ServiceCallError::circuit_open("auth-service")), 503);
        assert_eq!(
            status_of(ServiceCallError::timeout("auth-service", Duration::from_secs(10))),
            504
        );
        assert_eq!(status_of(ServiceCallError::network("auth-service", "refused")), 502);
        assert_eq!(status_of(ServiceCallError::http("auth-service", 403, "no")), 403);
        assert_eq!(status_of(ServiceCallError::http("auth-service", 302, "moved")), 502);
    }

    #[test]
    fn test_error_body_shape() {
        let response = GatewayError::from(ServiceCallError::circuit_open("chat-service"))
            .error_response();
        let bytes = response.into_body().try_into_bytes().unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert!(!body.success);
        assert_eq!(body.error.code, "CIRCUIT_BREAKER_OPEN");
        assert_eq!(body.error.message, "Circuit breaker for chat-service is open");
        assert!(body.error.timestamp > 0);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = GatewayError::Internal("secret detail".to_string()).error_response();
        assert_eq!(response.status().as_u16(), 500);

        let bytes = response.into_body().try_into_bytes().unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.message, "An internal error occurred");
    }
}
