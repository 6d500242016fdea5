//! QR API 路由配置

use actix_web::web;

use super::crud::{
    delete_qr, get_qr, get_qr_stats, legacy_create, legacy_stats, list_qr, post_qr,
};
use super::templated::{post_calendar, post_vcard, post_wifi};

/// `/api/qr`
///
/// 包含：
/// - GET/POST /api/qr - 列表 / 创建
/// - POST /api/qr/wifi|vcard|calendar - 结构化二维码
/// - GET /api/qr/{id}/stats - 扫码统计
/// - GET/DELETE /api/qr/{id} - 详情 / 删除
pub fn qr_api_routes() -> actix_web::Scope {
    web::scope("/api/qr")
        .route("", web::get().to(list_qr))
        .route("", web::post().to(post_qr))
        // 固定路径必须在 /{id} 之前
        .route("/wifi", web::post().to(post_wifi))
        .route("/vcard", web::post().to(post_vcard))
        .route("/calendar", web::post().to(post_calendar))
        .route("/{id}/stats", web::get().to(get_qr_stats))
        .route("/{id}", web::get().to(get_qr))
        .route("/{id}", web::delete().to(delete_qr))
}

/// 旧版 `/qr` 路由
pub fn legacy_qr_routes() -> actix_web::Scope {
    web::scope("/qr")
        .route("/create", web::post().to(legacy_create))
        .route("/{id}/stats", web::get().to(legacy_stats))
}
