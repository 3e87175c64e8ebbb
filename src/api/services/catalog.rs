//! Tag 库存、job 记录与 deal page

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::AdminAuth;
use crate::services::{AppServices, TagInput};
use crate::storage::{DealPagePatch, NewJob};

use super::helpers::{created_response, error_from_taplinker, success_response};

#[derive(Debug, Default, Deserialize)]
pub struct GetTagsQuery {
    #[serde(rename = "type")]
    pub tag_type: Option<String>,
}

pub struct CatalogService;

impl CatalogService {
    /// GET /tags?type=
    pub async fn get_tags(
        query: web::Query<GetTagsQuery>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        match services.tags.list_tags(query.tag_type.as_deref()).await {
            Ok(tags) => success_response(json!({ "tags": tags })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// POST /tags
    pub async fn post_tag(
        body: web::Json<TagInput>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        match services.tags.create_tag(body.into_inner()).await {
            Ok(tag) => created_response(json!({ "tag": tag })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// GET /jobs
    pub async fn get_jobs(services: web::Data<AppServices>) -> HttpResponse {
        match services.jobs.list_jobs().await {
            Ok(jobs) => success_response(json!({ "jobs": jobs })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// POST /jobs
    pub async fn post_job(
        body: web::Json<NewJob>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        match services.jobs.create_job(body.into_inner()).await {
            Ok(job) => created_response(json!({ "job": job })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// GET /deal-page（公开）
    pub async fn get_deal_page(services: web::Data<AppServices>) -> HttpResponse {
        match services.deal_page.get().await {
            Ok(page) => success_response(json!({ "page": page })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// PUT /deal-page
    pub async fn put_deal_page(
        body: web::Json<DealPagePatch>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        match services.deal_page.update(body.into_inner()).await {
            Ok(page) => success_response(json!({ "page": page })),
            Err(e) => error_from_taplinker(&e),
        }
    }
}

pub fn catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tags")
            .wrap(AdminAuth)
            .route("", web::get().to(CatalogService::get_tags))
            .route("", web::post().to(CatalogService::post_tag)),
    )
    .service(
        web::scope("/jobs")
            .wrap(AdminAuth)
            .route("", web::get().to(CatalogService::get_jobs))
            .route("", web::post().to(CatalogService::post_job)),
    )
    .service(
        web::resource("/deal-page")
            .route(web::get().to(CatalogService::get_deal_page))
            .route(web::put().to(CatalogService::put_deal_page).wrap(AdminAuth)),
    );
}
