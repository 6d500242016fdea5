use crate::config::{StaticConfig, get_config};
use crate::render::PngRenderer;
use crate::services::{AnalyticsService, QrService, RedirectResolver, classifier_for};
use crate::storage::{SeaOrmStorage, StorageFactory};
use crate::utils::validate_http_url;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// 服务器和 CLI 共用的组件
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub qr_service: Arc<QrService>,
    pub redirect_resolver: Arc<RedirectResolver>,
    pub analytics_service: Arc<AnalyticsService>,
}

/// 按配置组装存储与业务服务
pub async fn prepare_services(config: &StaticConfig) -> Result<StartupContext> {
    let base_url = validate_http_url(&config.resolved_base_url())
        .context("Invalid qr.base_url")?;

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.get_backend_name());

    let renderer = Arc::new(PngRenderer::new(config.qr.module_size, config.qr.quiet_zone));
    let qr_service = Arc::new(QrService::new(
        storage.clone(),
        renderer,
        base_url.trim_end_matches('/'),
        &config.qr.output_dir,
        &config.qr.asset_root,
    ));

    let classifier = classifier_for(config.tracking.device_classifier);
    let redirect_resolver = Arc::new(RedirectResolver::new(storage.clone(), classifier));
    let analytics_service = Arc::new(AnalyticsService::new(storage.clone()));

    debug!(
        "Services ready: base_url={}, output_dir={}, classifier={}",
        qr_service.base_url(),
        config.qr.output_dir,
        config.tracking.device_classifier.as_ref()
    );

    Ok(StartupContext {
        storage,
        qr_service,
        redirect_resolver,
        analytics_service,
    })
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();
    let startup = prepare_services(&config).await?;

    tokio::fs::create_dir_all(&config.qr.output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", config.qr.output_dir))?;

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(startup)
}
