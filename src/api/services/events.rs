//! 事件上报（公开）与漏斗统计（管理员）

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::api::middleware::AdminAuth;
use crate::errors::{Result, TaplinkerError};
use crate::services::{AppServices, EventInput, FunnelQuery};
use crate::utils::ip::{client_ip, user_agent};

use super::error_code::ErrorCode;
use super::helpers::{
    INVALID_PAYLOAD_MESSAGE, api_result, error_from_taplinker, error_response, ok_response,
};

/// GET /events 查询参数（原样接收，在这里校验）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelParams {
    pub rep_id: Option<String>,
    pub days: Option<String>,
}

impl FunnelParams {
    pub fn into_query(self) -> Result<FunnelQuery> {
        let rep_id = match self.rep_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i32>()
                    .ok()
                    .filter(|id| *id > 0)
                    .ok_or_else(|| TaplinkerError::validation("Invalid repId"))?,
            ),
        };
        let days = match self.days.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| TaplinkerError::validation("days must be a positive integer"))?,
            ),
        };
        Ok(FunnelQuery { days, rep_id })
    }
}

/// POST /events 请求体：repId 必须是整数，type 必须是字符串
fn parse_event_body(body: &Value) -> Option<(i32, String, Option<Value>)> {
    let rep_id = body.get("repId")?.as_i64()?;
    let rep_id = i32::try_from(rep_id).ok()?;
    let event_type = body.get("type")?.as_str()?.to_string();
    let meta = body.get("meta").cloned();
    Some((rep_id, event_type, meta))
}

pub struct EventsService;

impl EventsService {
    /// POST /events
    pub async fn post_event(
        req: HttpRequest,
        body: web::Json<Value>,
        services: web::Data<AppServices>,
    ) -> impl Responder {
        let Some((rep_id, event_type, meta)) = parse_event_body(&body) else {
            trace!("Rejected event payload: {}", body.0);
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                INVALID_PAYLOAD_MESSAGE,
            );
        };

        let input = EventInput {
            rep_id,
            event_type,
            meta,
            user_agent: user_agent(&req),
            ip: client_ip(&req),
        };

        match services.recorder.record(input).await {
            Ok(()) => ok_response(),
            Err(e) => error_from_taplinker(&e),
        }
    }

    /// GET /events?repId=&days=
    pub async fn get_funnel(
        query: web::Query<FunnelParams>,
        services: web::Data<AppServices>,
    ) -> HttpResponse {
        let result = match query.into_inner().into_query() {
            Ok(query) => services.funnel.aggregate(query).await,
            Err(e) => Err(e),
        };
        api_result(result)
    }
}

pub fn events_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/events")
            .route(web::post().to(EventsService::post_event))
            .route(web::get().to(EventsService::get_funnel).wrap(AdminAuth)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_event_body() {
        let (rep_id, event_type, meta) =
            parse_event_body(&json!({"repId": 3, "type": "tap", "meta": {"a": 1}})).unwrap();
        assert_eq!(rep_id, 3);
        assert_eq!(event_type, "tap");
        assert_eq!(meta, Some(json!({"a": 1})));

        assert!(parse_event_body(&json!({"repId": "3", "type": "TAP"})).is_none());
        assert!(parse_event_body(&json!({"repId": 3})).is_none());
        assert!(parse_event_body(&json!({"repId": 3, "type": 1})).is_none());
        assert!(parse_event_body(&json!({"repId": 1.5, "type": "TAP"})).is_none());
        assert!(parse_event_body(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_funnel_params() {
        let query = FunnelParams {
            rep_id: Some("7".to_string()),
            days: Some("14".to_string()),
        }
        .into_query()
        .unwrap();
        assert_eq!(query.rep_id, Some(7));
        assert_eq!(query.days, Some(14));

        let empty = FunnelParams::default().into_query().unwrap();
        assert_eq!(empty.rep_id, None);
        assert_eq!(empty.days, None);

        assert!(
            FunnelParams {
                days: Some("abc".to_string()),
                ..Default::default()
            }
            .into_query()
            .is_err()
        );
        assert!(
            FunnelParams {
                rep_id: Some("x".to_string()),
                ..Default::default()
            }
            .into_query()
            .is_err()
        );
    }
}
