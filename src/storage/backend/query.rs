//! Query operations for SeaOrmStorage
//!
//! 只读查询，统一走 retry::with_retry。

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, EntityTrait, ExprTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::error;

use super::{SeaOrmStorage, retry};
use super::converters::model_to_code_record;
use crate::errors::{Result, SmartQrError};
use crate::storage::models::{CodeRecord, CodeSummary};

use migration::entities::{qr_code, scan_event};

impl SeaOrmStorage {
    /// 按 id 查询二维码，不存在时返回 Ok(None)
    pub async fn get_code(&self, id: &str) -> Result<Option<CodeRecord>> {
        let db = &self.db;
        let id_owned = id.to_string();

        retry::with_retry(&format!("get_code({})", id), self.retry_config, || async {
            qr_code::Entity::find_by_id(id_owned.clone()).one(db).await
        })
        .await
        .map(|model| model.map(model_to_code_record))
        .map_err(|e| {
            error!("查询二维码失败（重试后仍失败）: {}", e);
            SmartQrError::store_failure(format!("查询二维码 '{}' 失败: {}", id, e))
        })
    }

    /// 全部二维码，按创建时间倒序
    pub async fn list_codes(&self) -> Result<Vec<CodeRecord>> {
        let db = &self.db;

        let models = retry::with_retry("list_codes", self.retry_config, || async {
            qr_code::Entity::find()
                .order_by_desc(qr_code::Column::CreatedAt)
                .order_by_asc(qr_code::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| {
            error!("加载二维码列表失败（重试后仍失败）: {}", e);
            SmartQrError::store_failure(format!("加载二维码列表失败: {}", e))
        })?;

        Ok(models.into_iter().map(model_to_code_record).collect())
    }

    /// 每个二维码的扫码总数（只包含至少有一次扫码的 id）
    pub async fn scan_counts_by_code(&self) -> Result<HashMap<String, u64>> {
        let db = &self.db;

        let rows = retry::with_retry("scan_counts_by_code", self.retry_config, || async {
            scan_event::Entity::find()
                .select_only()
                .column(scan_event::Column::QrId)
                .column_as(scan_event::Column::Id.count(), "count")
                .group_by(scan_event::Column::QrId)
                .into_tuple::<(String, i64)>()
                .all(db)
                .await
        })
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, count)| (id, Ord::max(count, 0) as u64))
            .collect())
    }

    /// 列表视图：二维码 + 扫码数
    pub async fn list_code_summaries(&self) -> Result<Vec<CodeSummary>> {
        let records = self.list_codes().await?;
        let counts = self.scan_counts_by_code().await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let scan_count = counts.get(&record.id).copied().unwrap_or(0);
                CodeSummary { record, scan_count }
            })
            .collect())
    }

    /// 二维码总数（健康检查用）
    pub async fn count_codes(&self) -> Result<u64> {
        let db = &self.db;
        retry::with_retry("count_codes", self.retry_config, || async {
            qr_code::Entity::find().count(db).await
        })
        .await
        .map_err(Into::into)
    }
}
