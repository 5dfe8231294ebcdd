//! Integration tests for service-gateway
//!
//! These tests run real HTTP against mock downstream services.

pub mod error_handling_tests;
pub mod gateway_routes_tests;
pub mod health_tests;
pub mod proxy_tests;
pub mod service_client_tests;
