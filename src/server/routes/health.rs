//! Health check endpoints
//!
//! Both endpoints answer 200 even when the system is degraded; the body's
//! `status` field carries the verdict.

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/detailed", web::get().to(detailed_health_check)),
    );
}

/// Probe every downstream and report the aggregate
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let health = state
        .aggregator
        .check_system_health(&state.registry.clients())
        .await;
    Ok(HttpResponse::Ok().json(health))
}

/// The aggregate plus version, uptime, memory, feature flags and breaker states
pub async fn detailed_health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Detailed health check requested");

    let health = state
        .aggregator
        .detailed_health(&state.registry.clients(), &state.process)
        .await;
    Ok(HttpResponse::Ok().json(health))
}
