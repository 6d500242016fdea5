//! QR API CRUD 与统计端点

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::errors::Result;
use crate::services::{AnalyticsService, CreateQrRequest, QrService, ScanStats};
use crate::storage::CodeRecord;

use super::helpers::{api_result, error_from_smartqr, success_response};
use super::types::{CreatedQrResponse, DeleteQrResponse, QrDetail, QrListItem};

pub(super) fn created(service: &QrService, record: &CodeRecord, tracked: bool) -> CreatedQrResponse {
    let redirect_url = tracked.then(|| service.redirect_link(&record.id));
    CreatedQrResponse::new(record, redirect_url)
}

/// 创建二维码
pub async fn post_qr(
    body: web::Json<CreateQrRequest>,
    service: web::Data<Arc<QrService>>,
) -> ActixResult<impl Responder> {
    let req = body.into_inner();
    let tracked = req.use_redirect;
    trace!("QR API: create request for '{}'", req.name);

    Ok(match service.create(req).await {
        Ok(record) => success_response(created(&service, &record, tracked)),
        Err(e) => error_from_smartqr(&e),
    })
}

/// 列出全部二维码，按创建时间倒序
pub async fn list_qr(service: web::Data<Arc<QrService>>) -> ActixResult<impl Responder> {
    let result = service
        .list()
        .await
        .map(|codes| codes.into_iter().map(QrListItem::from).collect::<Vec<_>>());
    if let Ok(ref items) = result {
        trace!("QR API: returning {} codes", items.len());
    }
    Ok(api_result(result))
}

pub async fn get_qr(
    path: web::Path<String>,
    service: web::Data<Arc<QrService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result(service.get(&id).await.map(QrDetail::from)))
}

/// 删除二维码及其扫码记录
pub async fn delete_qr(
    path: web::Path<String>,
    service: web::Data<Arc<QrService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let result = service.delete(&id).await.map(|deleted_scans| {
        info!("QR API: deleted {} with {} scan events", id, deleted_scans);
        DeleteQrResponse {
            id: id.clone(),
            deleted_scans,
        }
    });
    Ok(api_result(result))
}

/// 未知 id 返回 404，已存在但无扫码返回全零统计
pub(super) async fn load_stats(
    id: &str,
    service: &QrService,
    analytics: &AnalyticsService,
) -> Result<ScanStats> {
    service.get(id).await?;
    analytics.stats(id).await
}

pub async fn get_qr_stats(
    path: web::Path<String>,
    service: web::Data<Arc<QrService>>,
    analytics: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    Ok(api_result(load_stats(&id, &service, &analytics).await))
}

/// 旧版创建接口，直接返回 `{id, name, image_url}`
pub async fn legacy_create(
    body: web::Json<CreateQrRequest>,
    service: web::Data<Arc<QrService>>,
) -> ActixResult<HttpResponse> {
    let req = body.into_inner();
    let tracked = req.use_redirect;
    Ok(match service.create(req).await {
        Ok(record) => HttpResponse::Ok().json(created(&service, &record, tracked)),
        Err(e) => error_from_smartqr(&e),
    })
}

/// 旧版统计接口，直接返回统计对象
pub async fn legacy_stats(
    path: web::Path<String>,
    service: web::Data<Arc<QrService>>,
    analytics: web::Data<Arc<AnalyticsService>>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    Ok(match load_stats(&id, &service, &analytics).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => error_from_smartqr(&e),
    })
}
