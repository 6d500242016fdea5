//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::SmartQrError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 二维码错误
/// - 6000-6099: 统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 二维码错误 3000-3099
    QrNotFound = 3000,
    QrInvalidInput = 3001,
    QrNoTarget = 3002,
    QrDatabaseError = 3005,
    QrRenderFailed = 3006,
    QrFileError = 3007,

    // 统计错误 6000-6099
    AnalyticsQueryFailed = 6000,
}

impl From<SmartQrError> for ErrorCode {
    fn from(err: SmartQrError) -> Self {
        match err {
            SmartQrError::NotFound(_) => ErrorCode::QrNotFound,
            SmartQrError::InvalidInput(_) => ErrorCode::QrInvalidInput,
            SmartQrError::InvalidState(_) => ErrorCode::QrNoTarget,
            SmartQrError::StoreFailure(_)
            | SmartQrError::DatabaseConfig(_)
            | SmartQrError::DatabaseConnection(_) => ErrorCode::QrDatabaseError,
            SmartQrError::Render(_) => ErrorCode::QrRenderFailed,
            SmartQrError::FileOperation(_) => ErrorCode::QrFileError,
            SmartQrError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(serde_json::to_string(&ErrorCode::QrNotFound).unwrap(), "3000");
        let code: ErrorCode = serde_json::from_str("1004").unwrap();
        assert_eq!(code, ErrorCode::NotFound);
    }

    #[test]
    fn test_from_smartqr_error() {
        assert_eq!(
            ErrorCode::from(SmartQrError::not_found("x")),
            ErrorCode::QrNotFound
        );
        assert_eq!(
            ErrorCode::from(SmartQrError::invalid_state("x")),
            ErrorCode::QrNoTarget
        );
        assert_eq!(
            ErrorCode::from(SmartQrError::store_failure("x")),
            ErrorCode::QrDatabaseError
        );
        assert_eq!(
            ErrorCode::from(SmartQrError::invalid_input("SSID is required")),
            ErrorCode::QrInvalidInput
        );
    }
}
