//! 客户端 IP 提取
//!
//! 部署在反向代理之后，取 X-Forwarded-For 的第一项（原始客户端）。
//! 没有该请求头时记录为空，不回退到 TCP 对端地址。

#[cfg(feature = "server")]
use actix_web::HttpRequest;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// 解析 X-Forwarded-For：第一项去空白，空则为 None
pub fn first_forwarded_ip(header: Option<&str>) -> Option<String> {
    header
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// 从请求中提取客户端 IP
#[cfg(feature = "server")]
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    first_forwarded_ip(
        req.headers()
            .get(FORWARDED_FOR_HEADER)
            .and_then(|h| h.to_str().ok()),
    )
}

/// 请求的 User-Agent
#[cfg(feature = "server")]
pub fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_forwarded_ip() {
        assert_eq!(
            first_forwarded_ip(Some(" 203.0.113.7 , 10.0.0.1")),
            Some("203.0.113.7".to_string())
        );
        assert_eq!(
            first_forwarded_ip(Some("198.51.100.2")),
            Some("198.51.100.2".to_string())
        );
        assert_eq!(first_forwarded_ip(Some("")), None);
        assert_eq!(first_forwarded_ip(Some(" , 10.0.0.1")), None);
        assert_eq!(first_forwarded_ip(None), None);
    }

    #[cfg(feature = "server")]
    #[test]
    fn test_client_ip_from_request() {
        let req = actix_web::test::TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("User-Agent", "Mozilla/5.0"))
            .to_http_request();
        assert_eq!(client_ip(&req), Some("203.0.113.7".to_string()));
        assert_eq!(user_agent(&req), Some("Mozilla/5.0".to_string()));

        let bare = actix_web::test::TestRequest::default().to_http_request();
        assert_eq!(client_ip(&bare), None);
        assert_eq!(user_agent(&bare), None);
    }
}
