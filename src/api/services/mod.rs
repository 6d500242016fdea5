pub mod frontend;
pub mod health;
pub mod images;
pub mod qr;
pub mod redirect;

use actix_web::web;

pub use frontend::{FrontendService, frontend_routes};
pub use health::{AppStartTime, HealthService, health_routes};
pub use images::{ImageService, image_routes};
pub use qr::{legacy_qr_routes, qr_api_routes};
pub use redirect::{RedirectService, redirect_routes};

/// 注册全部路由
///
/// 依赖的 `web::Data`：`Arc<SeaOrmStorage>`、`Arc<QrService>`、`Arc<RedirectResolver>`、
/// `Arc<AnalyticsService>`、`AppStartTime`，由调用方注入。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(qr::json_config())
        .configure(health_routes)
        .configure(frontend_routes)
        .service(qr_api_routes())
        .service(legacy_qr_routes())
        .service(image_routes())
        .service(redirect_routes());
}
