use std::fmt;

#[derive(Debug, Clone)]
pub enum TaplinkerError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    InvalidEventType(String),
    InvalidLead(String),
    NotFound(String),
    RepNotFound(String),
    Conflict(String),
    Unauthorized(String),
    Serialization(String),
    Notification(String),
}

impl TaplinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TaplinkerError::DatabaseConfig(_) => "E001",
            TaplinkerError::DatabaseConnection(_) => "E002",
            TaplinkerError::DatabaseOperation(_) => "E003",
            TaplinkerError::FileOperation(_) => "E004",
            TaplinkerError::Validation(_) => "E005",
            TaplinkerError::InvalidEventType(_) => "E006",
            TaplinkerError::InvalidLead(_) => "E007",
            TaplinkerError::NotFound(_) => "E008",
            TaplinkerError::RepNotFound(_) => "E009",
            TaplinkerError::Conflict(_) => "E010",
            TaplinkerError::Unauthorized(_) => "E011",
            TaplinkerError::Serialization(_) => "E012",
            TaplinkerError::Notification(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TaplinkerError::DatabaseConfig(_) => "Database Configuration Error",
            TaplinkerError::DatabaseConnection(_) => "Database Connection Error",
            TaplinkerError::DatabaseOperation(_) => "Database Operation Error",
            TaplinkerError::FileOperation(_) => "File Operation Error",
            TaplinkerError::Validation(_) => "Validation Error",
            TaplinkerError::InvalidEventType(_) => "Invalid Event Type",
            TaplinkerError::InvalidLead(_) => "Invalid Lead",
            TaplinkerError::NotFound(_) => "Resource Not Found",
            TaplinkerError::RepNotFound(_) => "Rep Not Found",
            TaplinkerError::Conflict(_) => "Conflict",
            TaplinkerError::Unauthorized(_) => "Unauthorized",
            TaplinkerError::Serialization(_) => "Serialization Error",
            TaplinkerError::Notification(_) => "Notification Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TaplinkerError::DatabaseConfig(msg)
            | TaplinkerError::DatabaseConnection(msg)
            | TaplinkerError::DatabaseOperation(msg)
            | TaplinkerError::FileOperation(msg)
            | TaplinkerError::Validation(msg)
            | TaplinkerError::InvalidEventType(msg)
            | TaplinkerError::InvalidLead(msg)
            | TaplinkerError::NotFound(msg)
            | TaplinkerError::RepNotFound(msg)
            | TaplinkerError::Conflict(msg)
            | TaplinkerError::Unauthorized(msg)
            | TaplinkerError::Serialization(msg)
            | TaplinkerError::Notification(msg) => msg,
        }
    }

    /// 对应的 HTTP 状态码
    #[cfg(feature = "server")]
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            TaplinkerError::Validation(_)
            | TaplinkerError::InvalidEventType(_)
            | TaplinkerError::InvalidLead(_) => StatusCode::BAD_REQUEST,
            TaplinkerError::NotFound(_) | TaplinkerError::RepNotFound(_) => StatusCode::NOT_FOUND,
            TaplinkerError::Conflict(_) => StatusCode::CONFLICT,
            TaplinkerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否为客户端错误（消息可以原样返回给调用方）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TaplinkerError::Validation(_)
                | TaplinkerError::InvalidEventType(_)
                | TaplinkerError::InvalidLead(_)
                | TaplinkerError::NotFound(_)
                | TaplinkerError::RepNotFound(_)
                | TaplinkerError::Conflict(_)
                | TaplinkerError::Unauthorized(_)
        )
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TaplinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TaplinkerError {}

// 便捷的构造函数
impl TaplinkerError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::Validation(msg.into())
    }

    pub fn invalid_event_type<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::InvalidEventType(msg.into())
    }

    pub fn invalid_lead<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::InvalidLead(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::NotFound(msg.into())
    }

    pub fn rep_not_found<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::RepNotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::Unauthorized(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::Serialization(msg.into())
    }

    pub fn notification<T: Into<String>>(msg: T) -> Self {
        TaplinkerError::Notification(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TaplinkerError {
    fn from(err: sea_orm::DbErr) -> Self {
        TaplinkerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TaplinkerError {
    fn from(err: std::io::Error) -> Self {
        TaplinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TaplinkerError {
    fn from(err: serde_json::Error) -> Self {
        TaplinkerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaplinkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_message() {
        let err = TaplinkerError::invalid_lead("Name is required");
        assert!(err.is_client_error());
        assert_eq!(err.message(), "Name is required");
        assert_eq!(err.format_simple(), "Invalid Lead: Name is required");
    }

    #[test]
    fn test_storage_errors_are_not_client_errors() {
        let err: TaplinkerError = sea_orm::DbErr::Custom("disk full".to_string()).into();
        assert!(!err.is_client_error());
        assert_eq!(err.code(), "E003");
    }

    #[cfg(feature = "server")]
    #[test]
    fn test_http_status_mapping() {
        use actix_web::http::StatusCode;

        assert_eq!(
            TaplinkerError::invalid_event_type("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TaplinkerError::rep_not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TaplinkerError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TaplinkerError::unauthorized("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TaplinkerError::notification("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
