//! 扫码解析集成测试

use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use smartqr::config::DatabaseConfig;
use smartqr::errors::SmartQrError;
use smartqr::services::{KeywordDeviceClassifier, RedirectResolver, RequestMetadata};
use smartqr::storage::{CodeRecord, DeviceClass, SeaOrmStorage, StorageFactory};

async fn setup() -> (TempDir, Arc<SeaOrmStorage>, RedirectResolver) {
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("redirect.db").display());
    let config = DatabaseConfig {
        database_url: db_url,
        ..Default::default()
    };
    let storage = StorageFactory::create(&config).await.expect("创建存储失败");
    let resolver = RedirectResolver::new(storage.clone(), Arc::new(KeywordDeviceClassifier));
    (dir, storage, resolver)
}

async fn insert_code(storage: &SeaOrmStorage, id: &str, payload: &str, redirect: Option<&str>) {
    storage
        .insert_code(&CodeRecord {
            id: id.to_string(),
            name: id.to_string(),
            payload: payload.to_string(),
            redirect_target: redirect.map(str::to_string),
            fill_color: "black".to_string(),
            back_color: "white".to_string(),
            logo_reference: None,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
}

fn meta(forwarded_for: Option<&str>, peer: Option<&str>, ua: Option<&str>) -> RequestMetadata {
    RequestMetadata {
        forwarded_for: forwarded_for.map(str::to_string),
        peer_addr: peer.map(str::to_string),
        user_agent: ua.map(str::to_string),
    }
}

#[tokio::test]
async fn test_resolve_prefers_redirect_target() {
    let (_dir, storage, resolver) = setup().await;
    insert_code(
        &storage,
        "a",
        "https://example.com",
        Some("https://example.com/menu"),
    )
    .await;

    let target = resolver
        .resolve("a", &meta(None, Some("10.0.0.1"), None))
        .await
        .unwrap();
    assert_eq!(target, "https://example.com/menu");
}

#[tokio::test]
async fn test_each_resolution_appends_one_event() {
    let (_dir, storage, resolver) = setup().await;
    insert_code(&storage, "a", "https://example.com", None).await;

    for expected in 1..=3u64 {
        resolver
            .resolve("a", &meta(None, Some("10.0.0.1"), None))
            .await
            .unwrap();
        assert_eq!(storage.count_scans("a").await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_unknown_id_is_not_found_without_event() {
    let (_dir, storage, resolver) = setup().await;
    insert_code(&storage, "a", "https://example.com", None).await;

    let err = resolver
        .resolve("missing", &meta(None, Some("10.0.0.1"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, SmartQrError::NotFound(_)));
    assert_eq!(storage.count_scans("missing").await.unwrap(), 0);
    assert_eq!(storage.count_scans("a").await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_redirect_falls_back_to_payload() {
    let (_dir, storage, resolver) = setup().await;
    insert_code(&storage, "a", "https://example.com", Some("")).await;

    let target = resolver.resolve("a", &RequestMetadata::default()).await.unwrap();
    assert_eq!(target, "https://example.com");
}

#[tokio::test]
async fn test_no_target_is_invalid_state_but_scan_is_logged() {
    let (_dir, storage, resolver) = setup().await;
    insert_code(&storage, "a", "   ", None).await;

    let err = resolver
        .resolve("a", &RequestMetadata::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SmartQrError::InvalidState(_)));
    assert_eq!(storage.count_scans("a").await.unwrap(), 1);
}

#[tokio::test]
async fn test_event_records_forwarded_ip_and_device() {
    let (_dir, storage, resolver) = setup().await;
    insert_code(&storage, "a", "https://example.com", None).await;

    resolver
        .resolve(
            "a",
            &meta(
                Some("203.0.113.7, 10.0.0.2"),
                Some("10.0.0.1"),
                Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148"),
            ),
        )
        .await
        .unwrap();

    let events = storage.recent_scans("a", 10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].source_ip.as_deref(), Some("203.0.113.7"));
    assert_eq!(events[0].device_class, Some(DeviceClass::Mobile));
}

#[tokio::test]
async fn test_event_falls_back_to_peer_address() {
    let (_dir, storage, resolver) = setup().await;
    insert_code(&storage, "a", "https://example.com", None).await;

    resolver
        .resolve("a", &meta(None, Some("192.0.2.44"), Some("Mozilla/5.0 (iPad; CPU OS 17_0)")))
        .await
        .unwrap();
    resolver
        .resolve("a", &meta(None, None, None))
        .await
        .unwrap();

    let events = storage.recent_scans("a", 10).await.unwrap();
    let ips: Vec<Option<String>> = events.iter().map(|e| e.source_ip.clone()).collect();
    assert!(ips.contains(&Some("192.0.2.44".to_string())));
    assert!(ips.contains(&None));

    let tablet = events
        .iter()
        .find(|e| e.source_ip.as_deref() == Some("192.0.2.44"))
        .unwrap();
    assert_eq!(tablet.device_class, Some(DeviceClass::Tablet));
}
