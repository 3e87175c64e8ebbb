//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error::InternalError, web};
use serde::Serialize;
use serde_json::json;
use tracing::{error, trace};

use crate::errors::TaplinkerError;

use super::error_code::ErrorCode;

/// 5xx 时返回给调用方的通用消息
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// JSON 请求体解析失败时的消息
pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid payload";

/// 错误响应体 `{ error, code }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建成功响应
pub fn success_response<T: Serialize>(body: T) -> HttpResponse {
    json_response(StatusCode::OK, &body)
}

/// 构建 201 响应
pub fn created_response<T: Serialize>(body: T) -> HttpResponse {
    json_response(StatusCode::CREATED, &body)
}

/// `{ ok: true }`
pub fn ok_response() -> HttpResponse {
    success_response(json!({ "ok": true }))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    json_response(
        status,
        &ErrorBody {
            error: message.to_string(),
            code,
        },
    )
}

/// 从 TaplinkerError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 服务端错误只返回通用消息，详细信息写入日志。
pub fn error_from_taplinker(err: &TaplinkerError) -> HttpResponse {
    let status = err.http_status();
    let code = ErrorCode::from(err);

    if err.is_client_error() {
        trace!("Request rejected: {}", err);
        error_response(status, code, err.message())
    } else {
        error!("Request failed: {}", err);
        error_response(status, code, INTERNAL_ERROR_MESSAGE)
    }
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON，失败时自动映射 TaplinkerError。
pub fn api_result<T: Serialize>(result: crate::errors::Result<T>) -> HttpResponse {
    match result {
        Ok(body) => success_response(body),
        Err(e) => error_from_taplinker(&e),
    }
}

/// JSON 请求体配置：解析失败统一返回 400 `{ error: "Invalid payload" }`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        trace!("Rejected JSON payload: {}", err);
        let response = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            INVALID_PAYLOAD_MESSAGE,
        );
        InternalError::from_response(err, response).into()
    })
}

/// 查询字符串解析失败时同样返回 400
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = format!("Invalid query: {}", err);
        let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
        InternalError::from_response(err, response).into()
    })
}

/// 路径参数无法解析（如 /reps/abc）时按 404 处理
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        let response = error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, "Not found");
        InternalError::from_response(err, response).into()
    })
}
