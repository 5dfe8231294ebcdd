//! HTTP response handling for errors

use super::service::ServiceCallError;
use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl GatewayError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            GatewayError::Service(service_error) => match service_error {
                ServiceCallError::CircuitOpen { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "CIRCUIT_BREAKER_OPEN")
                }
                ServiceCallError::Network { timed_out: true, .. } => {
                    (StatusCode::GATEWAY_TIMEOUT, "SERVICE_TIMEOUT")
                }
                ServiceCallError::Network { .. } => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
                ServiceCallError::Http { status, .. } => {
                    // Upstream client errors (401 from auth, 404, ...) pass through as-is.
                    let status = StatusCode::from_u16(*status)
                        .ok()
                        .filter(|s| s.is_client_error() || s.is_server_error())
                        .unwrap_or(StatusCode::BAD_GATEWAY);
                    (status, "UPSTREAM_ERROR")
                }
            },
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            GatewayError::BadGateway(_) | GatewayError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, "BAD_GATEWAY")
            }
            GatewayError::GatewayTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "GATEWAY_TIMEOUT"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.status_and_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR
            && !matches!(self, GatewayError::Config(_))
        {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let error_response = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
