//! API 模块常量定义

/// 管理员 token 的 sub
pub const ADMIN_SUBJECT: &str = "admin";

/// 管理员 token 的 token_type
pub const ADMIN_TOKEN_TYPE: &str = "admin";

/// Bearer 认证前缀
pub const BEARER_PREFIX: &str = "Bearer ";
