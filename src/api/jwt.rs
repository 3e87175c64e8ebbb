use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

use super::constants::{ADMIN_SUBJECT, ADMIN_TOKEN_TYPE};

/// Global cached JwtService instance
static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Get the cached JwtService instance
///
/// Initialized once from the `auth` config section and reused for every
/// admin request.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

/// Admin token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// 随机 secret（未配置时使用，重启后之前签发的 token 全部失效）
fn generate_secret(len: usize) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    std::iter::repeat_with(|| CHARS[rand::random_range(0..CHARS.len())] as char)
        .take(len)
        .collect()
}

/// HS256 token service for the admin API
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, token_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_minutes,
        }
    }

    /// Create JwtService from config
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        let secret = if config.auth.jwt_secret.trim().is_empty() {
            warn!(
                "JWT secret not configured, generating a random one; tokens from `taplinker token` will not validate"
            );
            generate_secret(32)
        } else {
            config.auth.jwt_secret.clone()
        };

        Self::new(&secret, config.auth.token_minutes)
    }

    pub fn token_minutes(&self) -> u64 {
        self.token_minutes
    }

    /// Generate an admin token
    pub fn generate_admin_token(&self) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.token_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ADMIN_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate an admin token
    pub fn validate_admin_token(
        &self,
        token: &str,
    ) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AdminClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != ADMIN_TOKEN_TYPE
            || token_data.claims.sub != ADMIN_SUBJECT
        {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test_secret_key_32_bytes_long!!", 60)
    }

    #[test]
    fn test_generate_and_validate_admin_token() {
        let service = create_test_service();
        let token = service.generate_admin_token().unwrap();
        let claims = service.validate_admin_token(&token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.token_type, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_admin_token("invalid.token.here").is_err());
        assert!(service.validate_admin_token("").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", 60);

        let token = service1.generate_admin_token().unwrap();
        assert!(service2.validate_admin_token(&token).is_err());
    }

    #[test]
    fn test_wrong_token_type_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = AdminClaims {
            sub: "admin".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        };
        let encoding_key = EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!");
        let token = encode(&Header::default(), &claims, &encoding_key).unwrap();

        assert!(service.validate_admin_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();

        // 过期时间超过默认 leeway
        let now = Utc::now();
        let claims = AdminClaims {
            sub: "admin".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "admin".to_string(),
        };
        let encoding_key = EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!");
        let token = encode(&Header::default(), &claims, &encoding_key).unwrap();

        assert!(service.validate_admin_token(&token).is_err());
    }

    #[test]
    fn test_generated_secret_is_alphanumeric() {
        let secret = generate_secret(32);
        assert_eq!(secret.len(), 32);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
