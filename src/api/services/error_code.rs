//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::TaplinkerError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 1000-1099: 通用错误
/// - 2000-2099: 事件错误
/// - 3000-3099: 线索错误
/// - 5000-5099: 存储与外部依赖错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,

    // 事件错误 2000-2099
    InvalidEventType = 2000,

    // 线索错误 3000-3099
    InvalidLead = 3000,
    RepNotFound = 3001,

    // 存储与外部依赖 5000-5099
    DatabaseError = 5000,
    NotificationFailed = 5001,
}

impl From<&TaplinkerError> for ErrorCode {
    fn from(err: &TaplinkerError) -> Self {
        match err {
            TaplinkerError::Validation(_) => ErrorCode::BadRequest,
            TaplinkerError::InvalidEventType(_) => ErrorCode::InvalidEventType,
            TaplinkerError::InvalidLead(_) => ErrorCode::InvalidLead,
            TaplinkerError::NotFound(_) => ErrorCode::NotFound,
            TaplinkerError::RepNotFound(_) => ErrorCode::RepNotFound,
            TaplinkerError::Conflict(_) => ErrorCode::Conflict,
            TaplinkerError::Unauthorized(_) => ErrorCode::Unauthorized,
            TaplinkerError::DatabaseConfig(_)
            | TaplinkerError::DatabaseConnection(_)
            | TaplinkerError::DatabaseOperation(_) => ErrorCode::DatabaseError,
            TaplinkerError::Notification(_) => ErrorCode::NotificationFailed,
            TaplinkerError::FileOperation(_) | TaplinkerError::Serialization(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::RepNotFound).unwrap(), "3001");
        assert_eq!(serde_json::to_string(&ErrorCode::BadRequest).unwrap(), "1000");
    }

    #[test]
    fn test_from_taplinker_error() {
        assert_eq!(
            ErrorCode::from(&TaplinkerError::invalid_lead("Name is required")),
            ErrorCode::InvalidLead
        );
        assert_eq!(
            ErrorCode::from(&TaplinkerError::database_operation("locked")),
            ErrorCode::DatabaseError
        );
        assert_eq!(
            ErrorCode::from(&TaplinkerError::conflict("Rep ID already exists")),
            ErrorCode::Conflict
        );
    }
}
