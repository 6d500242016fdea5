//! 结构化二维码端点：WiFi、vCard、日历事件
//!
//! 这些二维码直接编码文本，不经过 `/r/{id}`，因此不返回 redirect_url。

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use crate::services::{CalendarQrRequest, QrService, VcardQrRequest, WifiQrRequest};

use super::crud::created;
use super::helpers::{error_from_smartqr, success_response};

pub async fn post_wifi(
    body: web::Json<WifiQrRequest>,
    service: web::Data<Arc<QrService>>,
) -> ActixResult<impl Responder> {
    trace!("QR API: wifi request for ssid '{}'", body.ssid);
    Ok(match service.create_wifi(body.into_inner()).await {
        Ok(record) => success_response(created(&service, &record, false)),
        Err(e) => error_from_smartqr(&e),
    })
}

pub async fn post_vcard(
    body: web::Json<VcardQrRequest>,
    service: web::Data<Arc<QrService>>,
) -> ActixResult<impl Responder> {
    Ok(match service.create_vcard(body.into_inner()).await {
        Ok(record) => success_response(created(&service, &record, false)),
        Err(e) => error_from_smartqr(&e),
    })
}

pub async fn post_calendar(
    body: web::Json<CalendarQrRequest>,
    service: web::Data<Arc<QrService>>,
) -> ActixResult<impl Responder> {
    trace!("QR API: calendar request '{}'", body.summary);
    Ok(match service.create_calendar(body.into_inner()).await {
        Ok(record) => success_response(created(&service, &record, false)),
        Err(e) => error_from_smartqr(&e),
    })
}
