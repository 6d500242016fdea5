//! 生成图片的静态访问：`/static/qrcodes/{id}.png`
//!
//! 文件名必须是 `<uuid>.png`，其余一律 404，不会读到输出目录之外。

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{debug, error, trace};
use uuid::Uuid;

use crate::services::QrService;

pub struct ImageService;

impl ImageService {
    pub async fn serve_image(
        path: web::Path<String>,
        service: web::Data<Arc<QrService>>,
    ) -> impl Responder {
        let filename = path.into_inner();
        trace!("Serving QR image: {}", filename);

        let Some(id) = Self::parse_image_name(&filename) else {
            debug!("Rejected image name: {}", filename);
            return Self::not_found();
        };

        match tokio::fs::read(service.image_path(&id)).await {
            Ok(bytes) => HttpResponse::Ok()
                .content_type("image/png")
                .insert_header(("Cache-Control", "public, max-age=86400"))
                .body(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::not_found(),
            Err(e) => {
                error!("Failed to read image {}: {}", filename, e);
                HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR).body("Internal Server Error")
            }
        }
    }

    /// `<uuid>.png` → 规范化的 uuid 字符串
    fn parse_image_name(filename: &str) -> Option<String> {
        let stem = filename.strip_suffix(".png")?;
        Uuid::parse_str(stem).ok().map(|u| u.to_string())
    }

    fn not_found() -> HttpResponse {
        HttpResponse::NotFound()
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("File not found")
    }
}

pub fn image_routes() -> actix_web::Scope {
    web::scope("/static/qrcodes")
        .route("/{filename}", web::get().to(ImageService::serve_image))
        .route("/{filename}", web::head().to(ImageService::serve_image))
}
