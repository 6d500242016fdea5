//! Mutation operations for SeaOrmStorage
//!
//! 写操作不重试：失败直接返回 StoreFailure。

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use tracing::{error, info};

use super::SeaOrmStorage;
use super::converters::{code_record_to_active_model, new_scan_event_to_active_model};
use crate::errors::{Result, SmartQrError};
use crate::storage::models::{CodeRecord, NewScanEvent};

use migration::entities::{qr_code, scan_event};

impl SeaOrmStorage {
    pub async fn insert_code(&self, record: &CodeRecord) -> Result<()> {
        qr_code::Entity::insert(code_record_to_active_model(record))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                error!("插入二维码 '{}' 失败: {}", record.id, e);
                SmartQrError::store_failure(format!("插入二维码 '{}' 失败: {}", record.id, e))
            })?;

        info!("QR code stored: {} ({})", record.id, record.name);
        Ok(())
    }

    /// 追加一条扫码事件，返回新事件 id
    pub async fn insert_scan_event(&self, event: &NewScanEvent) -> Result<i64> {
        let result = scan_event::Entity::insert(new_scan_event_to_active_model(event))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("写入扫码事件失败 (qr_id: {}): {}", event.code_id, e);
                SmartQrError::store_failure(format!(
                    "写入扫码事件失败 (qr_id: {}): {}",
                    event.code_id, e
                ))
            })?;

        Ok(result.last_insert_id)
    }

    /// 在同一事务内删除二维码及其全部扫码事件
    ///
    /// 返回被删除的扫码事件数。记录不存在时返回 NotFound，事务回滚。
    pub async fn delete_code(&self, id: &str) -> Result<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SmartQrError::store_failure(format!("开始事务失败: {}", e)))?;

        let events = scan_event::Entity::delete_many()
            .filter(scan_event::Column::QrId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| SmartQrError::store_failure(format!("删除扫码事件失败: {}", e)))?;

        let record = qr_code::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| SmartQrError::store_failure(format!("删除二维码失败: {}", e)))?;

        if record.rows_affected == 0 {
            // txn 在 drop 时回滚
            return Err(SmartQrError::not_found(format!("QR code not found: {}", id)));
        }

        txn.commit()
            .await
            .map_err(|e| SmartQrError::store_failure(format!("提交事务失败: {}", e)))?;

        info!(
            "QR code deleted: {} ({} scan events removed)",
            id, events.rows_affected
        );
        Ok(events.rows_affected)
    }
}
