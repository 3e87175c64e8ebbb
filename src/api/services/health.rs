use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

use crate::services::AppServices;

use super::helpers::json_response;

/// 数据库 ping 超时
const DB_PING_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub database: DatabaseCheck,
    pub response_time_ms: u64,
}

/// Health Service
///
/// 直接 ping 数据库，不经过业务 service。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        services: web::Data<AppServices>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage = &services.storage;
        let database = match tokio::time::timeout(DB_PING_TIMEOUT, storage.ping()).await {
            Ok(Ok(())) => DatabaseCheck {
                status: "healthy".to_string(),
                backend: storage.backend_name().to_string(),
                error: None,
            },
            Ok(Err(e)) => {
                error!("Database health check failed: {}", e);
                DatabaseCheck {
                    status: "unhealthy".to_string(),
                    backend: storage.backend_name().to_string(),
                    error: Some("database error".to_string()),
                }
            }
            Err(_) => {
                error!("Database health check timeout");
                DatabaseCheck {
                    status: "unhealthy".to_string(),
                    backend: storage.backend_name().to_string(),
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = chrono::Utc::now();
        let is_healthy = database.status == "healthy";
        let body = HealthResponse {
            status: database.status.clone(),
            timestamp: now.to_rfc3339(),
            uptime: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
            database,
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        debug!(
            "Health check completed in {:?}, status: {}",
            start_time.elapsed(),
            body.status
        );

        let status = if is_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        json_response(status, &body)
    }

    // 活跃性检查，不访问数据库
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check))
        .route("/health/live", web::get().to(HealthService::liveness_check));
}
