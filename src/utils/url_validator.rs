//! 跳转地址校验
//!
//! 显式指定的 redirect_url 和配置中的 base_url 只允许 http/https。

use url::Url;

use crate::errors::SmartQrError;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for SmartQrError {
    fn from(err: UrlValidationError) -> Self {
        SmartQrError::invalid_input(err.to_string())
    }
}

const DANGEROUS_PROTOCOLS: &[&str] = &["javascript:", "data:", "file:", "vbscript:", "blob:"];

/// 校验 http(s) 地址，返回去掉首尾空白后的字符串
pub fn validate_http_url(url: &str) -> Result<String, UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let lower = url.to_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| lower.starts_with(*p)) {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        let proto = lower
            .split_once(':')
            .map(|(scheme, _)| format!("{}:", scheme))
            .unwrap_or_else(|| "(none)".to_string());
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(
            validate_http_url("  https://example.com/menu?t=1 ").unwrap(),
            "https://example.com/menu?t=1"
        );
        assert!(validate_http_url("http://192.168.1.10:8000").is_ok());
    }

    #[test]
    fn test_rejects_dangerous_and_unknown_schemes() {
        assert!(matches!(
            validate_http_url("javascript:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert_eq!(
            validate_http_url("ftp://example.com"),
            Err(UrlValidationError::InvalidProtocol("ftp:".to_string()))
        );
        assert_eq!(
            validate_http_url("example.com"),
            Err(UrlValidationError::InvalidProtocol("(none)".to_string()))
        );
        assert_eq!(validate_http_url(" "), Err(UrlValidationError::EmptyUrl));
    }

    #[test]
    fn test_converts_to_invalid_input() {
        let err: SmartQrError = validate_http_url("data:text/plain,hi").unwrap_err().into();
        assert!(matches!(err, SmartQrError::InvalidInput(_)));
    }
}
