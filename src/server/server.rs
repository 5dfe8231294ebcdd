//! HTTP server core implementation

use crate::config::{Config, CorsConfig, ServerConfig};
use crate::core::services::ServiceEnvironment;
use crate::server::middleware::RequestIdMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: &Config, env: &ServiceEnvironment) -> Result<Self> {
        info!("Creating HTTP server");

        let state = AppState::from_config(config.clone(), env)?;
        Ok(Self {
            config: config.gateway.server.clone(),
            state,
        })
    }

    fn cors(config: &CorsConfig) -> Cors {
        if !config.enabled {
            return Cors::default();
        }

        let mut cors = if config.allows_all_origins() {
            if let Err(e) = config.validate() {
                warn!(error = %e, "CORS Configuration Warning");
            }
            Cors::default().allow_any_origin()
        } else {
            config
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };

        cors = cors
            .allow_any_method()
            .allow_any_header()
            .expose_headers(["x-request-id"])
            .max_age(config.max_age);
        if config.allow_credentials {
            cors = cors.supports_credentials();
        }
        cors
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let server_config = state.config.server();
        let cors = Self::cors(&server_config.cors);
        let payload = web::PayloadConfig::new(server_config.max_body_size);

        App::new()
            .app_data(state)
            .app_data(payload)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .wrap(DefaultHeaders::new().add(("Server", "service-gateway")))
            .configure(routes::health::configure_routes)
            .configure(routes::auth::configure_routes)
            .default_service(web::to(routes::proxy::proxy_request))
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(self.config.worker_count())
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    fn format_bind_error(e: std::io::Error, bind_addr: &str, port: u16) -> GatewayError {
        match e.kind() {
            std::io::ErrorKind::AddrInUse => GatewayError::server(format!(
                "Failed to bind to {}: port {} is already in use",
                bind_addr, port
            )),
            std::io::ErrorKind::PermissionDenied => GatewayError::server(format!(
                "Failed to bind to {}: permission denied for port {}",
                bind_addr, port
            )),
            _ => GatewayError::server(format!("Failed to bind to {}: {}", bind_addr, e)),
        }
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
