use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::services::AppServices;
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
}

/// 准备服务器启动的上下文
/// 包括 TLS provider、存储（含迁移）与 service 装配
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    // ureq 通知请求使用 rustls
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    // 提前初始化，未配置 secret 时在启动日志中告警
    crate::api::jwt::get_jwt_service();

    let config = crate::config::get_config();
    if config.notify.is_configured() {
        info!("Lead notifications enabled via {}", config.notify.api_url);
    } else {
        warn!("Lead notifications disabled (notify.api_key / notify.to not set)");
    }

    let services = AppServices::from_config(storage.clone());

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, services })
}
