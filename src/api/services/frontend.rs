//! 浏览器界面：仪表盘、创建表单、统计页
//!
//! 模板用 RustEmbed 嵌入，`%NAME%` 占位符在响应前替换。插入的用户数据一律先做 HTML 转义。

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use rust_embed::Embed;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::errors::SmartQrError;
use crate::services::styling::StyleOptions;
use crate::services::templates::ContactCard;
use crate::services::{
    AnalyticsService, CalendarQrRequest, CreateQrRequest, QrService, VcardQrRequest,
    WifiQrRequest,
};
use crate::storage::CodeRecord;
use crate::utils::truncate_chars;

use super::qr::image_url;

// 使用 RustEmbed 自动嵌入页面模板
#[derive(Embed)]
#[folder = "web/"]
struct WebTemplates;

/// 统计页展示的最近扫码条数
const RECENT_SCANS_LIMIT: u64 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub created: Option<String>,
}

/// 创建表单，所有字段都是字符串，未填的为空
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateForm {
    pub mode: String,
    pub name: String,
    // url
    pub data: String,
    pub redirect_url: String,
    // wifi
    pub ssid: String,
    pub password: String,
    pub encryption: String,
    pub hidden: Option<String>,
    // vcard
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
    // calendar
    pub summary: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
    // style
    pub fill_color: String,
    pub back_color: String,
    pub logo_path: String,
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl CreateForm {
    fn style(&self) -> StyleOptions {
        StyleOptions {
            fill_color: non_blank(&self.fill_color),
            back_color: non_blank(&self.back_color),
            logo_path: non_blank(&self.logo_path),
        }
    }

    fn mode(&self) -> &str {
        match self.mode.trim() {
            "" => "url",
            m => m,
        }
    }

    async fn submit(&self, service: &QrService) -> Result<CodeRecord, SmartQrError> {
        match self.mode() {
            "url" => {
                let mut req = CreateQrRequest::new(self.name.clone(), self.data.clone());
                req.redirect_url = non_blank(&self.redirect_url);
                req.style = self.style();
                service.create(req).await
            }
            "wifi" => {
                service
                    .create_wifi(WifiQrRequest {
                        name: non_blank(&self.name),
                        ssid: self.ssid.clone(),
                        password: self.password.clone(),
                        encryption: non_blank(&self.encryption).unwrap_or_else(|| "WPA".to_string()),
                        hidden: self.hidden.is_some(),
                        style: self.style(),
                    })
                    .await
            }
            "vcard" => {
                service
                    .create_vcard(VcardQrRequest {
                        name: non_blank(&self.name),
                        card: ContactCard {
                            first_name: self.first_name.clone(),
                            last_name: self.last_name.clone(),
                            organization: self.organization.clone(),
                            title: self.title.clone(),
                            phone: self.phone.clone(),
                            email: self.email.clone(),
                            website: self.website.clone(),
                            address: self.address.clone(),
                        },
                        style: self.style(),
                    })
                    .await
            }
            "calendar" => {
                service
                    .create_calendar(CalendarQrRequest {
                        name: non_blank(&self.name),
                        summary: self.summary.clone(),
                        start: self.start.clone(),
                        end: self.end.clone(),
                        location: self.location.clone(),
                        description: self.description.clone(),
                        style: self.style(),
                    })
                    .await
            }
            other => Err(SmartQrError::invalid_input(format!(
                "Unsupported QR type: {}",
                other
            ))),
        }
    }

    /// 回填表单用的占位符
    fn placeholders(&self) -> Vec<(&'static str, String)> {
        let mut values = vec![
            ("NAME", escape_html(&self.name)),
            ("DATA", escape_html(&self.data)),
            ("REDIRECT_URL", escape_html(&self.redirect_url)),
            ("SSID", escape_html(&self.ssid)),
            ("PASSWORD", escape_html(&self.password)),
            (
                "HIDDEN_CHECKED",
                if self.hidden.is_some() { "checked" } else { "" }.to_string(),
            ),
            ("FIRST_NAME", escape_html(&self.first_name)),
            ("LAST_NAME", escape_html(&self.last_name)),
            ("ORGANIZATION", escape_html(&self.organization)),
            ("TITLE", escape_html(&self.title)),
            ("PHONE", escape_html(&self.phone)),
            ("EMAIL", escape_html(&self.email)),
            ("WEBSITE", escape_html(&self.website)),
            ("ADDRESS", escape_html(&self.address)),
            ("SUMMARY", escape_html(&self.summary)),
            ("START", escape_html(&self.start)),
            ("END", escape_html(&self.end)),
            ("LOCATION", escape_html(&self.location)),
            ("DESCRIPTION", escape_html(&self.description)),
            ("FILL_COLOR", escape_html(&self.fill_color)),
            ("BACK_COLOR", escape_html(&self.back_color)),
            ("LOGO_PATH", escape_html(&self.logo_path)),
        ];

        for (key, mode) in [
            ("MODE_URL", "url"),
            ("MODE_WIFI", "wifi"),
            ("MODE_VCARD", "vcard"),
            ("MODE_CALENDAR", "calendar"),
        ] {
            let selected = if self.mode() == mode { "selected" } else { "" };
            values.push((key, selected.to_string()));
        }

        let encryption = non_blank(&self.encryption).unwrap_or_else(|| "WPA".to_string());
        for (key, value) in [("ENC_WPA", "WPA"), ("ENC_WEP", "WEP"), ("ENC_NOPASS", "nopass")] {
            let selected = if encryption.eq_ignore_ascii_case(value) { "selected" } else { "" };
            values.push((key, selected.to_string()));
        }

        values
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // 防止用户数据里的 %KEY% 被后续占位符替换命中
            '%' => out.push_str("&#37;"),
            _ => out.push(c),
        }
    }
    out
}

pub struct FrontendService;

impl FrontendService {
    /// 读取模板并替换 `%KEY%` 占位符
    fn render(template: &str, values: &[(&str, String)]) -> Result<String, SmartQrError> {
        let content = WebTemplates::get(template).ok_or_else(|| {
            SmartQrError::file_operation(format!("Template not embedded: {}", template))
        })?;
        let mut html = String::from_utf8_lossy(&content.data).into_owned();
        for (key, value) in values {
            html = html.replace(&format!("%{}%", key), value);
        }
        Ok(html.replace("%SMARTQR_VERSION%", env!("CARGO_PKG_VERSION")))
    }

    fn html_response(status: StatusCode, rendered: Result<String, SmartQrError>) -> HttpResponse {
        match rendered {
            Ok(html) => HttpResponse::build(status)
                .content_type("text/html; charset=utf-8")
                .body(html),
            Err(e) => {
                error!("Page rendering failed: {}", e);
                HttpResponse::InternalServerError()
                    .content_type("text/plain; charset=utf-8")
                    .body("Internal Server Error")
            }
        }
    }

    fn not_found_page() -> HttpResponse {
        HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body("<h1>404</h1><p>QR Code not found</p>")
    }

    /// `GET /dashboard`
    pub async fn dashboard(
        query: web::Query<DashboardQuery>,
        service: web::Data<Arc<QrService>>,
    ) -> impl Responder {
        trace!("Serving dashboard");

        let codes = match service.list().await {
            Ok(codes) => codes,
            Err(e) => return Self::html_response(StatusCode::OK, Err(e)),
        };

        let mut rows = String::new();
        for summary in &codes {
            let record = &summary.record;
            let target = record.redirect_target.as_deref().unwrap_or("");
            rows.push_str(&format!(
                "<tr><td><img src=\"{img}\" alt=\"\" width=\"64\"></td><td>{name}</td>\
                 <td class=\"target\">{target}</td><td>{scans}</td><td>{created}</td>\
                 <td><a href=\"/stats/{id}\">Stats</a> · <a href=\"{img}\" download>PNG</a></td></tr>\n",
                img = image_url(&record.id),
                name = escape_html(&record.name),
                target = escape_html(&truncate_chars(target, 60)),
                scans = summary.scan_count,
                created = record.created_at.format("%Y-%m-%d %H:%M"),
                id = record.id,
            ));
        }
        if codes.is_empty() {
            rows.push_str("<tr><td colspan=\"6\">No QR codes yet.</td></tr>");
        }

        let banner = match query.created.as_deref() {
            Some(id) => match service.get(id).await {
                Ok(record) => format!(
                    "<div class=\"banner\"><img src=\"{}\" alt=\"\" width=\"160\">\
                     <p>Created <strong>{}</strong></p></div>",
                    image_url(&record.id),
                    escape_html(&record.name)
                ),
                Err(e) => {
                    debug!("Dashboard banner skipped: {}", e);
                    String::new()
                }
            },
            None => String::new(),
        };

        Self::html_response(
            StatusCode::OK,
            Self::render(
                "dashboard.html",
                &[
                    ("CREATED_BANNER", banner),
                    ("ROWS", rows),
                    ("TOTAL", codes.len().to_string()),
                ],
            ),
        )
    }

    fn create_page(status: StatusCode, form: &CreateForm, error: Option<&str>) -> HttpResponse {
        let mut values = form.placeholders();
        values.push((
            "ERROR",
            error
                .map(|e| format!("<div class=\"error\">{}</div>", escape_html(e)))
                .unwrap_or_default(),
        ));
        Self::html_response(status, Self::render("create.html", &values))
    }

    /// `GET /create`
    pub async fn create_form() -> impl Responder {
        Self::create_page(StatusCode::OK, &CreateForm::default(), None)
    }

    /// `POST /create`：成功 303 到仪表盘，失败带错误信息重新渲染表单
    pub async fn create_submit(
        form: web::Form<CreateForm>,
        service: web::Data<Arc<QrService>>,
    ) -> impl Responder {
        let form = form.into_inner();
        match form.submit(&service).await {
            Ok(record) => HttpResponse::SeeOther()
                .insert_header(("Location", format!("/dashboard?created={}", record.id)))
                .finish(),
            Err(e) => {
                debug!("Create form rejected: {}", e);
                Self::create_page(e.http_status(), &form, Some(e.message()))
            }
        }
    }

    /// `GET /stats/{id}`，未知 id 直接 404
    pub async fn stats_page(
        path: web::Path<String>,
        service: web::Data<Arc<QrService>>,
        analytics: web::Data<Arc<AnalyticsService>>,
    ) -> impl Responder {
        let id = path.into_inner();

        let record = match service.get(&id).await {
            Ok(record) => record,
            Err(SmartQrError::NotFound(_)) => return Self::not_found_page(),
            Err(e) => return Self::html_response(StatusCode::OK, Err(e)),
        };

        let stats = match analytics.stats(&id).await {
            Ok(stats) => stats,
            Err(e) => return Self::html_response(StatusCode::OK, Err(e)),
        };
        let recent = match analytics.recent_scans(&id, RECENT_SCANS_LIMIT).await {
            Ok(recent) => recent,
            Err(e) => return Self::html_response(StatusCode::OK, Err(e)),
        };

        let mut day_rows = String::new();
        for day in &stats.scans_per_day {
            day_rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                day.date, day.count
            ));
        }
        if day_rows.is_empty() {
            day_rows.push_str("<tr><td colspan=\"2\">No scans yet.</td></tr>");
        }

        let mut recent_rows = String::new();
        for scan in &recent {
            recent_rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                scan.timestamp.format("%Y-%m-%d %H:%M:%S"),
                escape_html(scan.source_ip.as_deref().unwrap_or("-")),
                scan.device_class.as_ref().map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            ));
        }

        Self::html_response(
            StatusCode::OK,
            Self::render(
                "stats.html",
                &[
                    ("ID", record.id.clone()),
                    ("NAME", escape_html(&record.name)),
                    ("IMAGE_URL", image_url(&record.id)),
                    (
                        "TARGET",
                        escape_html(record.redirect_target.as_deref().unwrap_or("")),
                    ),
                    ("TOTAL_SCANS", stats.total_scans.to_string()),
                    ("UNIQUE_VISITORS", stats.unique_visitors.to_string()),
                    ("REPEAT_SCANS", stats.repeat_scans.to_string()),
                    ("DAY_ROWS", day_rows),
                    ("RECENT_ROWS", recent_rows),
                ],
            ),
        )
    }
}

pub fn frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(FrontendService::dashboard))
        .route("/create", web::get().to(FrontendService::create_form))
        .route("/create", web::post().to(FrontendService::create_submit))
        .route("/stats/{id}", web::get().to(FrontendService::stats_page));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("%NAME%"), "&#37;NAME&#37;");
    }

    #[test]
    fn test_form_mode_defaults_to_url() {
        let form = CreateForm::default();
        assert_eq!(form.mode(), "url");
        let values = form.placeholders();
        assert!(values.contains(&("MODE_URL", "selected".to_string())));
        assert!(values.contains(&("ENC_WPA", "selected".to_string())));
    }

    #[test]
    fn test_form_style_skips_blank_fields() {
        let form = CreateForm {
            fill_color: "  ".to_string(),
            back_color: "#fff".to_string(),
            ..Default::default()
        };
        let style = form.style();
        assert_eq!(style.fill_color, None);
        assert_eq!(style.back_color.as_deref(), Some("#fff"));
    }

    #[test]
    fn test_templates_are_embedded() {
        for name in ["dashboard.html", "create.html", "stats.html"] {
            assert!(WebTemplates::get(name).is_some(), "{} missing", name);
        }
    }
}
