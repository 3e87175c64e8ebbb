use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{info, trace};

use crate::api::constants::BEARER_PREFIX;
use crate::api::jwt::get_jwt_service;
use crate::api::services::error_code::ErrorCode;
use crate::api::services::helpers::ErrorBody;

/// Admin authentication middleware
///
/// 只接受 `Authorization: Bearer <admin JWT>`，失败时返回 401 JSON。
#[derive(Clone)]
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!(
            "Admin authentication failed for {} {}",
            req.method(),
            req.path()
        );
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ErrorBody {
                    error: "Unauthorized".to_string(),
                    code: ErrorCode::Unauthorized,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// 验证 Bearer token（JWT）
    fn validate_bearer_token(token: &str) -> bool {
        match get_jwt_service().validate_admin_token(token) {
            Ok(_claims) => {
                trace!("Bearer token validation successful");
                true
            }
            Err(e) => {
                info!("Bearer token validation failed: {}", e);
                false
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            if let Some(token) = Self::extract_bearer_token(&req)
                && Self::validate_bearer_token(&token)
            {
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            Ok(Self::handle_unauthorized(req))
        })
    }
}
