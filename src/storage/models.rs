use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 扫码设备类别
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

/// 二维码定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRecord {
    pub id: String,
    pub name: String,
    /// 二维码代表的原始数据（URL、WiFi/vCard/iCal 文本）
    pub payload: String,
    /// 非空时扫码跳转到这里，否则回退到 payload
    pub redirect_target: Option<String>,
    pub fill_color: String,
    pub back_color: String,
    pub logo_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CodeRecord {
    /// 扫码解析目标：redirect_target 优先，其次 payload，二者都为空返回 None
    pub fn resolution_target(&self) -> Option<&str> {
        match self.redirect_target.as_deref() {
            Some(target) if !target.trim().is_empty() => Some(target),
            _ if !self.payload.trim().is_empty() => Some(&self.payload),
            _ => None,
        }
    }
}

/// 扫码事件（只追加）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    pub id: i64,
    pub code_id: String,
    pub timestamp: DateTime<Utc>,
    pub source_ip: Option<String>,
    pub device_class: Option<DeviceClass>,
    pub country: Option<String>,
}

/// 待写入的扫码事件
#[derive(Debug, Clone)]
pub struct NewScanEvent {
    pub code_id: String,
    pub timestamp: DateTime<Utc>,
    pub source_ip: Option<String>,
    pub device_class: Option<DeviceClass>,
}

/// 按 UTC 日期聚合的扫码数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// 列表视图：二维码 + 扫码总数
#[derive(Debug, Clone, Serialize)]
pub struct CodeSummary {
    #[serde(flatten)]
    pub record: CodeRecord,
    pub scan_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(payload: &str, redirect: Option<&str>) -> CodeRecord {
        CodeRecord {
            id: "id".to_string(),
            name: "n".to_string(),
            payload: payload.to_string(),
            redirect_target: redirect.map(str::to_string),
            fill_color: "black".to_string(),
            back_color: "white".to_string(),
            logo_reference: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolution_target_prefers_redirect() {
        let r = record("https://a.example", Some("https://b.example"));
        assert_eq!(r.resolution_target(), Some("https://b.example"));
    }

    #[test]
    fn test_resolution_target_falls_back_to_payload() {
        assert_eq!(
            record("https://example.com", Some("")).resolution_target(),
            Some("https://example.com")
        );
        assert_eq!(
            record("https://example.com", None).resolution_target(),
            Some("https://example.com")
        );
        assert_eq!(record("", None).resolution_target(), None);
        assert_eq!(record("  ", Some(" ")).resolution_target(), None);
    }

    #[test]
    fn test_device_class_string_forms() {
        use std::str::FromStr;
        assert_eq!(DeviceClass::Mobile.to_string(), "mobile");
        assert_eq!(DeviceClass::from_str("Tablet").unwrap(), DeviceClass::Tablet);
        assert!(DeviceClass::from_str("watch").is_err());
    }
}
