//! Token verification endpoint

use crate::core::client::normalize_headers;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::Result;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/verify", web::post().to(verify));
}

/// Relay the caller's credentials to the auth service and return its claims
pub async fn verify(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    debug!("Token verification requested");

    let headers = normalize_headers(
        req.headers()
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?.to_string()))),
    );
    let claims = state.verifier.verify_request(&headers).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(claims)))
}
