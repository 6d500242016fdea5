//! Scan analytics
//!
//! 每次调用都直接从 scan_events 聚合，不缓存。未知 id 返回全零统计，
//! 是否存在由调用方（HTTP 层）判断。

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::errors::Result;
use crate::storage::{DailyCount, ScanEvent, SeaOrmStorage};

/// 单个二维码的扫码统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub qr_id: String,
    pub total_scans: u64,
    /// 按 UTC 日期升序，没有扫码的日期不出现
    pub scans_per_day: Vec<DailyCount>,
    /// 不同的非空来源地址数
    pub unique_visitors: u64,
    /// total_scans - unique_visitors，不小于 0
    pub repeat_scans: u64,
}

impl ScanStats {
    pub fn empty(qr_id: &str) -> Self {
        Self {
            qr_id: qr_id.to_string(),
            total_scans: 0,
            scans_per_day: Vec::new(),
            unique_visitors: 0,
            repeat_scans: 0,
        }
    }
}

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn stats(&self, code_id: &str) -> Result<ScanStats> {
        let total_scans = self.storage.count_scans(code_id).await?;
        if total_scans == 0 {
            return Ok(ScanStats::empty(code_id));
        }

        let scans_per_day = self.storage.scans_per_day(code_id).await?;
        let unique_visitors = self.storage.distinct_ip_count(code_id).await?;

        debug!(
            "Analytics: {} total={}, days={}, unique={}",
            code_id,
            total_scans,
            scans_per_day.len(),
            unique_visitors
        );

        Ok(ScanStats {
            qr_id: code_id.to_string(),
            total_scans,
            scans_per_day,
            unique_visitors,
            repeat_scans: total_scans.saturating_sub(unique_visitors),
        })
    }

    /// 最近的扫码事件（统计页展示用）
    pub async fn recent_scans(&self, code_id: &str, limit: u64) -> Result<Vec<ScanEvent>> {
        self.storage.recent_scans(code_id, limit).await
    }
}
