//! Tap 入口：/tap/{repId}、/r/{repId}、/tap/{repId}/contact.vcf

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, trace};

use crate::api::render;
use crate::errors::TaplinkerError;
use crate::services::{AppServices, TapContext, TapResolution};
use crate::storage::{EventMeta, EventType};
use crate::utils::ip::{client_ip, user_agent};

pub struct TapService;

impl TapService {
    pub async fn handle_tap(
        req: HttpRequest,
        path: web::Path<String>,
        services: web::Data<AppServices>,
    ) -> impl Responder {
        let raw_id = path.into_inner();
        let ctx = TapContext {
            path: req.path().to_string(),
            user_agent: user_agent(&req),
            ip: client_ip(&req),
        };

        match services.tap_resolver.resolve(&raw_id, ctx).await {
            Ok(TapResolution::Redirect { rep_id, url }) => {
                trace!("Tap {} -> 302 {}", rep_id, url);
                HttpResponse::Found()
                    .insert_header(("Location", url))
                    .insert_header(("Cache-Control", "no-store"))
                    .finish()
            }
            Ok(TapResolution::Profile(rep)) => Self::html_response(
                StatusCode::OK,
                render::profile_page(&rep),
            ),
            Err(e) => Self::failure_response(&raw_id, e),
        }
    }

    /// vCard 下载，同时记录 CONTACT_SAVE（best-effort）
    pub async fn handle_contact(
        req: HttpRequest,
        path: web::Path<String>,
        services: web::Data<AppServices>,
    ) -> impl Responder {
        let raw_id = path.into_inner();
        let rep = match services.tap_resolver.find_active_rep(&raw_id).await {
            Ok(rep) => rep,
            Err(e) => return Self::failure_response(&raw_id, e),
        };

        let mut meta = EventMeta::new();
        meta.insert("path".to_string(), json!(req.path()));
        services
            .recorder
            .record_typed(
                rep.id,
                EventType::ContactSave,
                meta,
                user_agent(&req),
                client_ip(&req),
            )
            .await;

        HttpResponse::Ok()
            .insert_header(("Content-Type", "text/vcard; charset=utf-8"))
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", render::vcard_filename(&rep)),
            ))
            .insert_header(("Cache-Control", "no-store"))
            .body(render::vcard(
                &rep,
                Some(&crate::config::get_config().server.public_base_url),
            ))
    }

    fn failure_response(raw_id: &str, err: TaplinkerError) -> HttpResponse {
        match err {
            TaplinkerError::NotFound(_) => {
                debug!("Tap target not found: {}", raw_id);
                Self::html_response(StatusCode::NOT_FOUND, render::not_found_page())
            }
            e => {
                error!("Tap resolution failed for {}: {}", raw_id, e);
                Self::html_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    render::server_error_page(),
                )
            }
        }
    }

    #[inline]
    fn html_response(status: StatusCode, body: String) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .body(body)
    }
}

/// Tap 路由（公开）
pub fn tap_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tap/{rep_id}/contact.vcf",
        web::get().to(TapService::handle_contact),
    )
    .route("/tap/{rep_id}", web::get().to(TapService::handle_tap))
    .route("/r/{rep_id}", web::get().to(TapService::handle_tap));
}
