//! QR API 帮助函数

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::SmartQrError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 SmartQrError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_smartqr(err: &SmartQrError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("API error: {}", err);
    } else {
        debug!("API rejected request: {}", err);
    }
    let error_code = ErrorCode::from(err.clone());
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 SmartQrError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<SmartQrError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: SmartQrError = e.into();
            error_from_smartqr(&err)
        }
    }
}

/// 请求体解析失败时也返回统一的 JSON 错误
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let message = format!("Invalid JSON body: {}", err);
            let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
            InternalError::from_response(err, response).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_success_response() {
        let response = success_response("success_data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_from_smartqr_status() {
        let cases = [
            (SmartQrError::not_found("x"), StatusCode::NOT_FOUND),
            (SmartQrError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (SmartQrError::invalid_state("x"), StatusCode::BAD_REQUEST),
            (
                SmartQrError::store_failure("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_from_smartqr(&err).status(), status);
        }
    }

    #[actix_rt::test]
    async fn test_error_body_envelope() {
        let response = api_result::<(), _>(Err(SmartQrError::not_found("QR code not found: x")));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], ErrorCode::QrNotFound as i32);
        assert_eq!(json["message"], "QR code not found: x");
        assert!(json.get("data").is_none());
    }
}
