//! User-Agent → 设备类别
//!
//! 默认使用关键字匹配；`tracking.device_classifier = "woothee"` 时改用 woothee 解析。

use std::sync::Arc;

use woothee::parser::Parser;

use crate::config::DeviceClassifierKind;
use crate::storage::DeviceClass;

/// 设备分类策略
pub trait DeviceClassifier: Send + Sync {
    /// 空或缺失的 User-Agent 返回 None（未知）
    fn classify(&self, user_agent: Option<&str>) -> Option<DeviceClass>;
}

/// 按配置构造分类器
pub fn classifier_for(kind: DeviceClassifierKind) -> Arc<dyn DeviceClassifier> {
    match kind {
        DeviceClassifierKind::Keyword => Arc::new(KeywordDeviceClassifier),
        DeviceClassifierKind::Woothee => Arc::new(WootheeDeviceClassifier),
    }
}

fn non_empty(user_agent: Option<&str>) -> Option<&str> {
    user_agent.filter(|ua| !ua.trim().is_empty())
}

/// 大小写不敏感的子串匹配
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordDeviceClassifier;

impl DeviceClassifier for KeywordDeviceClassifier {
    fn classify(&self, user_agent: Option<&str>) -> Option<DeviceClass> {
        let ua = non_empty(user_agent)?.to_lowercase();

        // mobile 优先：Android 平板 UA 里同时可能出现 "android"
        if ["mobile", "android", "iphone"].iter().any(|k| ua.contains(k)) {
            Some(DeviceClass::Mobile)
        } else if ["tablet", "ipad"].iter().any(|k| ua.contains(k)) {
            Some(DeviceClass::Tablet)
        } else {
            Some(DeviceClass::Desktop)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WootheeDeviceClassifier;

impl DeviceClassifier for WootheeDeviceClassifier {
    fn classify(&self, user_agent: Option<&str>) -> Option<DeviceClass> {
        let ua = non_empty(user_agent)?;
        let result = Parser::new().parse(ua).unwrap_or_default();

        if result.os == "iPad" || ua.to_lowercase().contains("tablet") {
            return Some(DeviceClass::Tablet);
        }

        match result.category {
            "smartphone" | "mobilephone" => Some(DeviceClass::Mobile),
            _ => Some(DeviceClass::Desktop),
        }
    }
}
