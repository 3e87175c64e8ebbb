//! Admin API: reps

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::AdminAuth;
use crate::services::AppServices;
use crate::storage::{NewRep, RepPatch};

use super::helpers::{created_response, error_from_taplinker, success_response};

#[derive(Debug, Default, Deserialize)]
pub struct GetRepsQuery {
    pub stats: Option<String>,
}

pub struct RepsService;

impl RepsService {
    /// GET /reps?stats=true
    pub async fn get_reps(
        query: web::Query<GetRepsQuery>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        let with_stats = query.stats.as_deref() == Some("true");
        match services.reps.list_reps(with_stats).await {
            Ok(reps) => success_response(json!({ "reps": reps })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// POST /reps
    pub async fn post_rep(
        body: web::Json<NewRep>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        match services.reps.create_rep(body.into_inner()).await {
            Ok(rep) => created_response(json!({ "rep": rep })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// GET /reps/{id}
    pub async fn get_rep(path: web::Path<i32>, services: web::Data<AppServices>) -> HttpResponse {
        match services.reps.get_rep_detail(path.into_inner()).await {
            Ok(rep) => success_response(json!({ "rep": rep })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// PATCH /reps/{id}
    pub async fn patch_rep(
        path: web::Path<i32>,
        body: web::Json<RepPatch>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        match services
            .reps
            .patch_rep(path.into_inner(), body.into_inner())
            .await
        {
            Ok(rep) => success_response(json!({ "rep": rep })),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// DELETE /reps/{id}（停用，不删除）
    pub async fn delete_rep(
        path: web::Path<i32>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        match services.reps.deactivate_rep(path.into_inner()).await {
            Ok(rep) => success_response(json!({ "rep": rep })),
            Err(e) => error_from_taplinker(&e),
        }
    }
}

pub fn reps_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reps")
            .wrap(AdminAuth)
            .route("", web::get().to(RepsService::get_reps))
            .route("", web::post().to(RepsService::post_rep))
            .route("/{id}", web::get().to(RepsService::get_rep))
            .route("/{id}", web::patch().to(RepsService::patch_rep))
            .route("/{id}", web::delete().to(RepsService::delete_rep)),
    );
}
