//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, Logger},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::services::{AppStartTime, configure_routes};
use crate::runtime::lifetime;

/// Build CORS middleware from `server.cors_allowed_origins`
///
/// Empty list keeps the browser's same-origin policy.
fn build_cors_middleware(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Prepares storage and services
/// 3. Configures and starts the HTTP server
/// 4. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let services = web::Data::new(startup.services);
    let start_time = web::Data::new(app_start_time);

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let allowed_origins = config.server.cors_allowed_origins.clone();
    if allowed_origins.iter().any(|o| o == "*") {
        warn!("CORS allows any origin");
    }

    // HttpServer 接管 storage 之前保留连接用于关闭
    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(build_cors_middleware(&allowed_origins))
            .wrap(Compress::default())
            .app_data(services.clone())
            .app_data(start_time.clone())
            .app_data(web::PayloadConfig::new(64 * 1024))
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = crate::system::shutdown::listen_for_shutdown(db_for_shutdown) => {
            warn!("Graceful shutdown: database connections released");
        }
    }

    Ok(())
}
