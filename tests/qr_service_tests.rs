//! 二维码创建与管理集成测试

use std::sync::Arc;

use tempfile::TempDir;

use smartqr::config::DatabaseConfig;
use smartqr::errors::SmartQrError;
use smartqr::render::PngRenderer;
use smartqr::services::styling::StyleOptions;
use smartqr::services::templates::ContactCard;
use smartqr::services::{
    CalendarQrRequest, CreateQrRequest, QrService, VcardQrRequest, WifiQrRequest,
};
use smartqr::storage::{SeaOrmStorage, StorageFactory};

const BASE_URL: &str = "http://qr.test:8000";

struct TestEnv {
    _dir: TempDir,
    storage: Arc<SeaOrmStorage>,
    service: QrService,
}

async fn setup() -> TestEnv {
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("qr.db").display());
    let config = DatabaseConfig {
        database_url: db_url,
        ..Default::default()
    };
    let storage = StorageFactory::create(&config).await.expect("创建存储失败");
    let service = QrService::new(
        storage.clone(),
        Arc::new(PngRenderer::new(4, true)),
        format!("{}/", BASE_URL),
        dir.path().join("qrcodes"),
        dir.path(),
    );
    TestEnv {
        _dir: dir,
        storage,
        service,
    }
}

fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(b"\x89PNG\r\n\x1a\n")
}

#[tokio::test]
async fn test_create_writes_png_and_record() {
    let env = setup().await;
    let record = env
        .service
        .create(CreateQrRequest::new("Menu", "  https://example.com/menu  "))
        .await
        .unwrap();

    assert_eq!(record.name, "Menu");
    assert_eq!(record.payload, "https://example.com/menu");
    assert_eq!(record.redirect_target.as_deref(), Some("https://example.com/menu"));
    assert_eq!(record.fill_color, "black");
    assert_eq!(record.back_color, "white");
    assert!(uuid::Uuid::parse_str(&record.id).is_ok());

    let png = std::fs::read(env.service.image_path(&record.id)).unwrap();
    assert!(is_png(&png));

    let stored = env.storage.get_code(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.payload, record.payload);
    assert_eq!(
        env.service.redirect_link(&record.id),
        format!("{}/r/{}", BASE_URL, record.id)
    );
}

#[tokio::test]
async fn test_create_with_explicit_redirect_and_style() {
    let env = setup().await;
    let mut req = CreateQrRequest::new("", "Spring campaign");
    req.redirect_url = Some("https://example.com/spring".to_string());
    req.style = StyleOptions {
        fill_color: Some("#1A2B3C".to_string()),
        back_color: Some("Yellow".to_string()),
        logo_path: Some("missing-logo.png".to_string()),
    };

    let record = env.service.create(req).await.unwrap();
    assert_eq!(record.name, "Untitled");
    assert_eq!(record.redirect_target.as_deref(), Some("https://example.com/spring"));
    assert_eq!(record.fill_color, "#1a2b3c");
    assert_eq!(record.back_color, "yellow");
    // 找不到的 logo 被忽略
    assert_eq!(record.logo_reference, None);
}

#[tokio::test]
async fn test_logo_outside_asset_root_is_ignored() {
    let env = setup().await;
    let outside = TempDir::new().unwrap();
    let logo = outside.path().join("logo.png");
    image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]))
        .save(&logo)
        .unwrap();

    let mut req = CreateQrRequest::new("Outside", "https://example.com");
    req.style.logo_path = Some(logo.to_string_lossy().into_owned());
    let record = env.service.create(req).await.unwrap();
    assert_eq!(record.logo_reference, None);
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let env = setup().await;

    let err = env
        .service
        .create(CreateQrRequest::new("x", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, SmartQrError::InvalidInput(_)));

    let mut req = CreateQrRequest::new("x", "https://example.com");
    req.style.fill_color = Some("not-a-color".to_string());
    let err = env.service.create(req).await.unwrap_err();
    assert!(matches!(err, SmartQrError::InvalidInput(_)));

    let mut req = CreateQrRequest::new("x", "https://example.com");
    req.redirect_url = Some("javascript:alert(1)".to_string());
    let err = env.service.create(req).await.unwrap_err();
    assert!(matches!(err, SmartQrError::InvalidInput(_)));

    assert_eq!(env.storage.count_codes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_wifi_requires_ssid() {
    let env = setup().await;
    let err = env
        .service
        .create_wifi(WifiQrRequest {
            ssid: "  ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SmartQrError::InvalidInput(_)));
}

#[tokio::test]
async fn test_wifi_encodes_payload_directly() {
    let env = setup().await;
    let record = env
        .service
        .create_wifi(WifiQrRequest {
            ssid: "Cafe".to_string(),
            password: "secret".to_string(),
            encryption: "WPA".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(record.name, "WiFi");
    assert!(record.payload.starts_with("WIFI:T:WPA;S:Cafe;P:secret;"));
    assert!(is_png(&std::fs::read(env.service.image_path(&record.id)).unwrap()));
}

#[tokio::test]
async fn test_vcard_requires_first_name() {
    let env = setup().await;
    let err = env
        .service
        .create_vcard(VcardQrRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SmartQrError::InvalidInput(_)));

    let record = env
        .service
        .create_vcard(VcardQrRequest {
            name: None,
            card: ContactCard {
                first_name: "Ada".to_string(),
                ..Default::default()
            },
            style: StyleOptions::default(),
        })
        .await
        .unwrap();
    assert_eq!(record.name, "Contact");
    assert!(record.payload.contains("FN:Ada"));
}

#[tokio::test]
async fn test_calendar_validation() {
    let env = setup().await;

    let missing = env
        .service
        .create_calendar(CalendarQrRequest {
            summary: "Launch".to_string(),
            start: "2025-06-01T10:00".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(missing, SmartQrError::InvalidInput(_)));

    let malformed = env
        .service
        .create_calendar(CalendarQrRequest {
            summary: "Launch".to_string(),
            start: "tomorrow".to_string(),
            end: "2025-06-01T11:00".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(malformed, SmartQrError::InvalidInput(_)));

    let reversed = env
        .service
        .create_calendar(CalendarQrRequest {
            summary: "Launch".to_string(),
            start: "2025-06-01T11:00".to_string(),
            end: "2025-06-01T10:00".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(reversed, SmartQrError::InvalidInput(_)));

    let record = env
        .service
        .create_calendar(CalendarQrRequest {
            summary: "Launch".to_string(),
            start: "2025-06-01T10:00".to_string(),
            end: "2025-06-01T11:00".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(record.name, "Event");
    assert!(record.payload.contains("DTSTART:20250601T100000Z"));
    assert!(record.payload.contains("DTEND:20250601T110000Z"));
}

#[tokio::test]
async fn test_get_unknown_is_not_found() {
    let env = setup().await;
    let err = env.service.get("nope").await.unwrap_err();
    assert!(matches!(err, SmartQrError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_removes_record_and_image() {
    let env = setup().await;
    let record = env
        .service
        .create(CreateQrRequest::new("Menu", "https://example.com"))
        .await
        .unwrap();
    let image = env.service.image_path(&record.id);
    assert!(image.exists());

    env.service.delete(&record.id).await.unwrap();
    assert!(!image.exists());
    assert!(matches!(
        env.service.get(&record.id).await,
        Err(SmartQrError::NotFound(_))
    ));

    let err = env.service.delete(&record.id).await.unwrap_err();
    assert!(matches!(err, SmartQrError::NotFound(_)));
}

#[tokio::test]
async fn test_list_returns_newest_first() {
    let env = setup().await;
    let first = env
        .service
        .create(CreateQrRequest::new("first", "https://example.com/1"))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let second = env
        .service
        .create(CreateQrRequest::new("second", "https://example.com/2"))
        .await
        .unwrap();

    let list = env.service.list().await.unwrap();
    let ids: Vec<&str> = list.iter().map(|s| s.record.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    assert!(list.iter().all(|s| s.scan_count == 0));
}
