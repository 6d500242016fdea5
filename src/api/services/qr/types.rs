//! QR API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{CodeRecord, CodeSummary};
use crate::utils::truncate_chars;

/// 详情接口中 data 字段的最大展示长度
pub const PAYLOAD_PREVIEW_CHARS: usize = 200;

/// 生成图片的公开访问路径
pub fn image_url(id: &str) -> String {
    format!("/static/qrcodes/{}.png", id)
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 创建成功后的返回
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreatedQrResponse {
    pub id: String,
    pub name: String,
    pub image_url: String,
    /// 图片编码的跳转地址；结构化二维码没有
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl CreatedQrResponse {
    pub fn new(record: &CodeRecord, redirect_url: Option<String>) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            image_url: image_url(&record.id),
            redirect_url,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QrListItem {
    pub id: String,
    pub name: String,
    pub redirect_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub scan_count: u64,
    pub image_url: String,
}

impl From<CodeSummary> for QrListItem {
    fn from(summary: CodeSummary) -> Self {
        let image_url = image_url(&summary.record.id);
        Self {
            id: summary.record.id,
            name: summary.record.name,
            redirect_url: summary.record.redirect_target,
            created_at: summary.record.created_at,
            scan_count: summary.scan_count,
            image_url,
        }
    }
}

/// 单个二维码详情，data 超长时截断
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QrDetail {
    pub id: String,
    pub name: String,
    pub data: String,
    pub redirect_url: Option<String>,
    pub fill_color: String,
    pub back_color: String,
    pub logo_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub image_url: String,
}

impl From<CodeRecord> for QrDetail {
    fn from(record: CodeRecord) -> Self {
        Self {
            data: truncate_chars(&record.payload, PAYLOAD_PREVIEW_CHARS),
            image_url: image_url(&record.id),
            id: record.id,
            name: record.name,
            redirect_url: record.redirect_target,
            fill_color: record.fill_color,
            back_color: record.back_color,
            logo_path: record.logo_reference,
            created_at: record.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeleteQrResponse {
    pub id: String,
    pub deleted_scans: u64,
}

/// 存储健康检查状态
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    pub codes_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
}

/// 健康检查响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(payload: &str) -> CodeRecord {
        CodeRecord {
            id: "abc".to_string(),
            name: "Menu".to_string(),
            payload: payload.to_string(),
            redirect_target: Some("https://example.com".to_string()),
            fill_color: "black".to_string(),
            back_color: "white".to_string(),
            logo_reference: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_detail_truncates_long_payload() {
        let detail = QrDetail::from(record(&"x".repeat(250)));
        assert_eq!(detail.data.chars().count(), PAYLOAD_PREVIEW_CHARS + 3);
        assert!(detail.data.ends_with("..."));
        assert_eq!(detail.image_url, "/static/qrcodes/abc.png");
    }

    #[test]
    fn test_detail_keeps_short_payload() {
        let detail = QrDetail::from(record("https://example.com"));
        assert_eq!(detail.data, "https://example.com");
    }

    #[test]
    fn test_api_response_omits_empty_data() {
        let resp: ApiResponse<()> = ApiResponse {
            code: 3000,
            message: "QR code not found".to_string(),
            data: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["code"], 3000);
        assert!(json.get("data").is_none());
    }
}
