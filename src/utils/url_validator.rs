//! URL 验证
//!
//! rep 的 redirectUrl、头像、日历链接等会直接出现在 Location 头
//! 或页面 href 中，只接受 http(s)。

use url::Url;

use crate::errors::{Result, TaplinkerError};

/// 验证 URL：必须能解析且协议为 http 或 https
pub fn validate_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TaplinkerError::validation("URL cannot be empty"));
    }

    let url = Url::parse(raw)
        .map_err(|e| TaplinkerError::validation(format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(TaplinkerError::validation(format!(
            "Invalid protocol: {}:. Only http:// and https:// are allowed",
            scheme
        ))),
    }
}

/// 可选 URL 字段：空白视为清空，否则必须通过 validate_url
pub fn validate_optional_url(raw: Option<&str>) -> Result<()> {
    match raw.map(str::trim) {
        None | Some("") => Ok(()),
        Some(url) => validate_url(url).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("https://example.com/deal").is_ok());
        assert!(validate_url("HTTP://example.com").is_ok());
        assert!(validate_url("  https://cal.com/rep-one  ").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("data:text/html,<b>x</b>").is_err());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("example.com/deal").is_err());
        assert!(validate_url("   ").is_err());
    }

    #[test]
    fn test_optional_url_allows_clearing() {
        assert!(validate_optional_url(None).is_ok());
        assert!(validate_optional_url(Some("")).is_ok());
        assert!(validate_optional_url(Some("  ")).is_ok());
        assert!(validate_optional_url(Some("mailto:a@b.c")).is_err());
    }
}
