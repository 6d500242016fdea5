use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::errors::SmartQrError;
use crate::services::{RedirectResolver, RequestMetadata};

/// Location 中保留原样的字符，其余（控制字符、空白、非 ASCII 等）百分号编码
const LOCATION_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':')
    .remove(b'/')
    .remove(b'%')
    .remove(b'#')
    .remove(b'?')
    .remove(b'=')
    .remove(b'@')
    .remove(b'[')
    .remove(b']')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';');

/// 目标可能是多行文本（vCard / iCal），编码后才能放进 header
pub fn encode_location(target: &str) -> String {
    utf8_percent_encode(target, LOCATION_SAFE).to_string()
}

pub struct RedirectService;

impl RedirectService {
    /// 扫码入口：记录事件后 302 到目标地址
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        resolver: web::Data<Arc<RedirectResolver>>,
    ) -> impl Responder {
        let code_id = path.into_inner();
        trace!("Redirect request for {}", code_id);

        let meta = RequestMetadata::from_request(&req);
        match resolver.resolve(&code_id, &meta).await {
            Ok(target) => HttpResponse::build(StatusCode::FOUND)
                .insert_header(("Location", encode_location(&target)))
                .insert_header(("Cache-Control", "no-store"))
                .finish(),
            Err(SmartQrError::NotFound(_)) => {
                debug!("Redirect target not found: {}", code_id);
                Self::plain_response(StatusCode::NOT_FOUND, "QR Code not found")
            }
            Err(SmartQrError::InvalidState(msg)) => {
                debug!("Redirect without target: {}", msg);
                Self::plain_response(StatusCode::BAD_REQUEST, "QR Code has no redirect target")
            }
            Err(e) => {
                error!("Redirect failed for {}: {}", code_id, e);
                Self::plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    fn plain_response(status: StatusCode, body: &'static str) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .body(body)
    }
}

/// `/r/{id}`，只接受 GET：HEAD 预取不应计入扫码
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/r").route("/{id}", web::get().to(RedirectService::handle_redirect))
}
