//! API 路由汇总
//!
//! 公开路由与管理员路由共用路径（如 GET/POST /events），
//! 管理员路由在 route 级别套上 AdminAuth。

use actix_web::web;

use super::catalog::catalog_routes;
use super::events::events_routes;
use super::health::health_routes;
use super::helpers::{json_config, path_config, query_config};
use super::leads::leads_routes;
use super::reps::reps_routes;
use super::tap::tap_routes;

/// 注册所有路由以及 JSON / Query / Path 解析配置
///
/// 调用方需要提供 `web::Data<AppServices>` 与 `web::Data<AppStartTime>`。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .configure(health_routes)
        .configure(tap_routes)
        .configure(events_routes)
        .configure(leads_routes)
        .configure(reps_routes)
        .configure(catalog_routes);
}
