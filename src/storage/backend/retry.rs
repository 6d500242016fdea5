//! 只读查询的退避重试
//!
//! 包装的读操作：`get_code`、`list_codes`、`scan_counts_by_code`、`count_codes`，
//! 以及统计用的 `count_scans`、`scans_per_day`、`distinct_ip_count`、`recent_scans`。
//! `insert_scan`、`insert_code` 和删除事务不经过这里，失败直接上报。

use std::future::Future;
use std::ops::Deref;
use std::time::Duration;

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// 锁冲突类错误码：MySQL 死锁/锁等待超时，PostgreSQL 序列化失败/死锁，SQLite BUSY/LOCKED
const TRANSIENT_SQL_CODES: &[&str] = &["1213", "1205", "40001", "40P01", "5", "6"];

/// 驱动没有错误码时按消息匹配
const TRANSIENT_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "serialization failure",
];

/// 连接池取连接失败、连接断开、锁冲突视为可重试；约束冲突等一律不重试
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime) | DbErr::Query(runtime) => is_transient(runtime),
        _ => false,
    }
}

fn is_transient(err: &RuntimeErr) -> bool {
    let message = match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            let code = sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code().map(|c| c.into_owned()));
            if let Some(code) = code {
                return TRANSIENT_SQL_CODES.contains(&code.as_str());
            }
            sqlx_err.to_string()
        }
        RuntimeErr::Internal(msg) => msg.clone(),
        #[allow(unreachable_patterns)]
        _ => return false,
    };
    let message = message.to_lowercase();
    TRANSIENT_MESSAGES.iter().any(|m| message.contains(m))
}

/// 来自 `[database]` 的 retry_count / retry_base_delay_ms / retry_max_delay_ms
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&DatabaseConfig::default())
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// 执行一次读查询，遇到可重试错误时按指数退避重试，最多 `max_retries` 次
///
/// `operation_name` 只用于日志，例如 `scans_per_day(<id>)`。
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut retries = 0;
    loop {
        let err = match operation().await {
            Ok(value) => {
                if retries > 0 {
                    debug!("{} succeeded after {} retries", operation_name, retries);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !is_retryable_error(&err) {
            debug!("{} failed, not retrying: {}", operation_name, err);
            return Err(err);
        }
        if retries >= config.max_retries {
            return Err(err);
        }

        retries += 1;
        let delay = calculate_backoff(retries, config.base_delay_ms, config.max_delay_ms);
        warn!(
            "{} failed ({}/{}), retrying in {} ms: {}",
            operation_name, retries, config.max_retries, delay, err
        );
        sleep(Duration::from_millis(delay)).await;
    }
}

/// 第 n 次重试的等待时间：base * 2^(n-1)，上限 max，再加 0-25% 抖动
fn calculate_backoff(retry: u32, base_ms: u64, max_ms: u64) -> u64 {
    let capped = base_ms
        .saturating_mul(2u64.saturating_pow(retry.saturating_sub(1)))
        .min(max_ms);
    capped.saturating_add(rand::random_range(0..=capped / 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 5,
            max_delay_ms: 20,
        }
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(is_retryable_error(&DbErr::ConnectionAcquire(
            sea_orm::error::ConnAcquireErr::Timeout
        )));
        assert!(is_retryable_error(&DbErr::Query(
            sea_orm::error::RuntimeErr::Internal("database is locked".to_string())
        )));
        assert!(is_retryable_error(&DbErr::Exec(
            sea_orm::error::RuntimeErr::Internal("Deadlock found".to_string())
        )));
    }

    #[test]
    fn test_constraint_and_missing_rows_are_not_retryable() {
        assert!(!is_retryable_error(&DbErr::RecordNotFound("qr".to_string())));
        assert!(!is_retryable_error(&DbErr::Exec(
            sea_orm::error::RuntimeErr::Internal("FOREIGN KEY constraint failed".to_string())
        )));
    }

    #[test]
    fn test_retry_config_follows_database_section() {
        let config = DatabaseConfig {
            retry_count: 7,
            retry_base_delay_ms: 50,
            retry_max_delay_ms: 800,
            ..Default::default()
        };
        let retry = RetryConfig::from(&config);
        assert_eq!(retry.max_retries, 7);
        assert_eq!(retry.base_delay_ms, 50);
        assert_eq!(retry.max_delay_ms, 800);
        assert_eq!(RetryConfig::default().max_retries, 3);
    }

    #[test]
    fn test_backoff_grows_and_is_capped() {
        let first = calculate_backoff(1, 100, 2000);
        assert!((100..=125).contains(&first));

        let third = calculate_backoff(3, 100, 2000);
        assert!((400..=500).contains(&third));

        let capped = calculate_backoff(12, 100, 2000);
        assert!((2000..=2500).contains(&capped));
    }

    #[tokio::test]
    async fn test_with_retry_recovers_from_busy_database() {
        let calls = AtomicU32::new(0);

        let result = with_retry("get_code(test)", fast_config(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DbErr::Query(sea_orm::error::RuntimeErr::Internal(
                        "database is locked".to_string(),
                    )))
                } else {
                    Ok("record")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "record");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_with_retry_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);

        let result = with_retry("count_scans(test)", fast_config(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<u64, _>(DbErr::ConnectionAcquire(
                    sea_orm::error::ConnAcquireErr::Timeout,
                ))
            }
        })
        .await;

        assert!(result.is_err());
        // 首次 + 2 次重试
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_returns_non_retryable_error_immediately() {
        let calls = AtomicU32::new(0);

        let result = with_retry("list_codes(test)", fast_config(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(DbErr::Custom("bad query".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
