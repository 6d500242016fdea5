//! 扫码解析
//!
//! 查找二维码 → 记录扫码事件 → 返回跳转目标。事件写入发生在目标计算之前，
//! 即使记录没有可用目标，这次扫码也会留下一条事件。

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::{Result, SmartQrError};
use crate::services::device::DeviceClassifier;
use crate::storage::{NewScanEvent, SeaOrmStorage};
use crate::utils::ip::effective_client_ip;

/// 解析扫码时用到的请求信息
#[derive(Debug, Clone, Default)]
pub struct RequestMetadata {
    /// X-Forwarded-For 原始值
    pub forwarded_for: Option<String>,
    /// 直连对端地址
    pub peer_addr: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMetadata {
    #[cfg(feature = "server")]
    pub fn from_request(req: &actix_web::HttpRequest) -> Self {
        use crate::utils::ip::{forwarded_for_header, peer_ip};

        Self {
            forwarded_for: forwarded_for_header(req).map(str::to_string),
            peer_addr: peer_ip(req),
            user_agent: req
                .headers()
                .get("User-Agent")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }
}

pub struct RedirectResolver {
    storage: Arc<SeaOrmStorage>,
    classifier: Arc<dyn DeviceClassifier>,
}

impl RedirectResolver {
    pub fn new(storage: Arc<SeaOrmStorage>, classifier: Arc<dyn DeviceClassifier>) -> Self {
        Self {
            storage,
            classifier,
        }
    }

    /// 解析一次扫码，返回跳转地址
    ///
    /// - 二维码不存在：NotFound，不写事件
    /// - 事件写入失败：StoreFailure，不重试
    /// - redirect_target 与 payload 都为空：InvalidState（事件已写入）
    pub async fn resolve(&self, code_id: &str, meta: &RequestMetadata) -> Result<String> {
        let record = self
            .storage
            .get_code(code_id)
            .await?
            .ok_or_else(|| SmartQrError::not_found(format!("QR code not found: {}", code_id)))?;

        let source_ip = effective_client_ip(meta.forwarded_for.as_deref(), meta.peer_addr.as_deref());
        let device_class = self.classifier.classify(meta.user_agent.as_deref());

        let event = NewScanEvent {
            code_id: record.id.clone(),
            timestamp: Utc::now(),
            source_ip,
            device_class,
        };
        let event_id = self.storage.insert_scan_event(&event).await?;

        info!(
            "Scan recorded: qr_id={}, event_id={}, ip={:?}, device={:?}",
            record.id, event_id, event.source_ip, event.device_class
        );

        match record.resolution_target() {
            Some(target) => {
                debug!("Resolved {} -> {}", record.id, target);
                Ok(target.to_string())
            }
            None => Err(SmartQrError::invalid_state(format!(
                "QR code {} has no redirect target",
                record.id
            ))),
        }
    }
}
