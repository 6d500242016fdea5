//! 客户端地址提取
//!
//! 扫码地址取 X-Forwarded-For 的第一项（去空白），为空时回退到直连地址。
//! 不做可信代理校验，地址只用于统计去重。

use actix_web::HttpRequest;

/// 从转发头和直连地址中挑出扫码方地址
pub fn effective_client_ip(forwarded_for: Option<&str>, peer_addr: Option<&str>) -> Option<String> {
    let forwarded = forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| peer_addr.map(str::trim).filter(|ip| !ip.is_empty()))
        .map(str::to_string)
}

/// X-Forwarded-For 原始值
pub fn forwarded_for_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
}

/// 直连对端 IP（不含端口）
pub fn peer_ip(req: &HttpRequest) -> Option<String> {
    req.peer_addr().map(|addr| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_first_forwarded_entry_wins() {
        assert_eq!(
            effective_client_ip(Some(" 203.0.113.7 , 10.0.0.1"), Some("127.0.0.1")),
            Some("203.0.113.7".to_string())
        );
    }

    #[test]
    fn test_empty_forwarded_entry_falls_back_to_peer() {
        assert_eq!(
            effective_client_ip(Some(" , 10.0.0.1"), Some("127.0.0.1")),
            Some("127.0.0.1".to_string())
        );
        assert_eq!(
            effective_client_ip(Some(""), Some("127.0.0.1")),
            Some("127.0.0.1".to_string())
        );
        assert_eq!(effective_client_ip(None, None), None);
    }

    #[test]
    fn test_request_helpers() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "198.51.100.2"))
            .peer_addr("192.0.2.1:54321".parse().unwrap())
            .to_http_request();

        assert_eq!(forwarded_for_header(&req), Some("198.51.100.2"));
        assert_eq!(peer_ip(&req), Some("192.0.2.1".to_string()));
    }
}
