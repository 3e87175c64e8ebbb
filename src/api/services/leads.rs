//! 线索：公开提交 + 管理员查询/修改

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::middleware::AdminAuth;
use crate::services::{AppServices, LeadInput, LeadListQuery};
use crate::storage::LeadPatch;
use crate::utils::ip::{client_ip, user_agent};

use super::helpers::{error_from_taplinker, success_response};

/// GET /leads 查询参数
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLeadsQuery {
    pub rep_id: Option<i32>,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

pub struct LeadsService;

impl LeadsService {
    /// POST /leads
    pub async fn post_lead(
        req: HttpRequest,
        body: web::Json<LeadInput>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        match services
            .leads
            .capture_lead(body.into_inner(), user_agent(&req), client_ip(&req))
            .await
        {
            Ok(lead) => success_response(json!({ "ok": true, "leadId": lead.id })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// GET /leads
    pub async fn get_leads(
        query: web::Query<GetLeadsQuery>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        let query = query.into_inner();
        let list_query = LeadListQuery {
            rep_id: query.rep_id,
            status: query.status.filter(|s| !s.is_empty()),
            limit: query.limit,
            skip: query.skip,
        };

        match services.leads.list_leads(list_query).await {
            Ok((leads, total)) => success_response(json!({ "leads": leads, "total": total })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// GET /leads/{id}
    pub async fn get_lead(
        path: web::Path<String>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        let lead = match services.leads.get_lead(&path.into_inner()).await {
            Ok(lead) => lead,
            Err(e) => return error_from_taplinker(&e),
        };
        match services.leads.with_rep(lead).await {
            Ok(lead) => success_response(json!({ "lead": lead })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// PATCH /leads/{id}
    pub async fn patch_lead(
        path: web::Path<String>,
        body: web::Json<LeadPatch>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        let id = path.into_inner();
        let lead = match services.leads.patch_lead(&id, body.into_inner()).await {
            Ok(lead) => lead,
            Err(e) => return error_from_taplinker(&e),
        };
        info!("Admin API: lead {} updated (status={})", lead.id, lead.status);
        match services.leads.with_rep(lead).await {
            Ok(lead) => success_response(json!({ "lead": lead })),
            Err(e) => error_from_taplinker(&e),
        }
    }
}

pub fn leads_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/leads")
            .route(web::post().to(LeadsService::post_lead))
            .route(web::get().to(LeadsService::get_leads).wrap(AdminAuth)),
    )
    .service(
        web::resource("/leads/{id}")
            .route(web::get().to(LeadsService::get_lead).wrap(AdminAuth))
            .route(web::patch().to(LeadsService::patch_lead).wrap(AdminAuth)),
    );
}
