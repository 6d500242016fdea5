//! 扫码统计相关的数据库查询
//!
//! 提供扫码事件的聚合查询方法，供 AnalyticsService 调用。

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DbBackend, EntityTrait, ExprTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};
use tracing::warn;

use super::{SeaOrmStorage, retry};
use crate::errors::{Result, SmartQrError};
use crate::storage::models::{DailyCount, ScanEvent};

use super::converters::model_to_scan_event;
use migration::entities::scan_event;

/// 按日聚合查询结果行
#[derive(Debug, FromQueryResult)]
struct DayRow {
    day: String,
    count: i64,
}

/// scanned_at 截断到 UTC 日期的表达式（YYYY-MM-DD）
fn day_expr(backend: DbBackend) -> Expr {
    match backend {
        DbBackend::Sqlite => Expr::cust("strftime('%Y-%m-%d', scanned_at)"),
        DbBackend::MySql => Expr::cust("DATE_FORMAT(scanned_at, '%Y-%m-%d')"),
        DbBackend::Postgres | _ => Expr::cust("TO_CHAR(scanned_at AT TIME ZONE 'UTC', 'YYYY-MM-DD')"),
    }
}

impl SeaOrmStorage {
    /// 指定二维码的扫码总数
    pub async fn count_scans(&self, code_id: &str) -> Result<u64> {
        let db = &self.db;
        retry::with_retry(
            &format!("count_scans({})", code_id),
            self.retry_config,
            || async {
                scan_event::Entity::find()
                    .filter(scan_event::Column::QrId.eq(code_id))
                    .count(db)
                    .await
            },
        )
        .await
        .map_err(Into::into)
    }

    /// 按 UTC 日期分组的扫码数，日期升序，不补零
    pub async fn scans_per_day(&self, code_id: &str) -> Result<Vec<DailyCount>> {
        let db = &self.db;
        let date_expr = day_expr(self.db_backend());

        let rows = retry::with_retry(
            &format!("scans_per_day({})", code_id),
            self.retry_config,
            || async {
                scan_event::Entity::find()
                    .select_only()
                    .column_as(date_expr.clone(), "day")
                    .column_as(scan_event::Column::Id.count(), "count")
                    .filter(scan_event::Column::QrId.eq(code_id))
                    .group_by(date_expr.clone())
                    .order_by_asc(Expr::cust("day"))
                    .into_model::<DayRow>()
                    .all(db)
                    .await
            },
        )
        .await?;

        rows.into_iter()
            .map(|row| {
                let date = NaiveDate::parse_from_str(&row.day, "%Y-%m-%d").map_err(|e| {
                    warn!("无法解析日期分组 '{}': {}", row.day, e);
                    SmartQrError::store_failure(format!("invalid day bucket '{}': {}", row.day, e))
                })?;
                Ok(DailyCount {
                    date,
                    count: Ord::max(row.count, 0) as u64,
                })
            })
            .collect()
    }

    /// 非空 ip_address 的去重数
    pub async fn distinct_ip_count(&self, code_id: &str) -> Result<u64> {
        let db = &self.db;

        let count = retry::with_retry(
            &format!("distinct_ip_count({})", code_id),
            self.retry_config,
            || async {
                scan_event::Entity::find()
                    .select_only()
                    .column_as(Expr::cust("COUNT(DISTINCT ip_address)"), "count")
                    .filter(scan_event::Column::QrId.eq(code_id))
                    .into_tuple::<i64>()
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(Ord::max(count.unwrap_or(0), 0) as u64)
    }

    /// 最近的扫码事件，时间倒序
    pub async fn recent_scans(&self, code_id: &str, limit: u64) -> Result<Vec<ScanEvent>> {
        let db = &self.db;

        let models = retry::with_retry(
            &format!("recent_scans({})", code_id),
            self.retry_config,
            || async {
                scan_event::Entity::find()
                    .filter(scan_event::Column::QrId.eq(code_id))
                    .order_by_desc(scan_event::Column::ScannedAt)
                    .order_by_desc(scan_event::Column::Id)
                    .limit(limit)
                    .all(db)
                    .await
            },
        )
        .await?;

        Ok(models.into_iter().map(model_to_scan_event).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    #[test]
    fn test_day_expr_per_backend() {
        let build = |backend: DbBackend| {
            scan_event::Entity::find()
                .select_only()
                .column_as(day_expr(backend), "day")
                .build(backend)
                .to_string()
        };

        assert!(build(DbBackend::Sqlite).contains("strftime('%Y-%m-%d', scanned_at)"));
        assert!(build(DbBackend::MySql).contains("DATE_FORMAT(scanned_at, '%Y-%m-%d')"));
        assert!(build(DbBackend::Postgres).contains("TO_CHAR(scanned_at"));
    }
}
