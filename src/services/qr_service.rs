//! 二维码创建与管理
//!
//! 创建流程：校验 → 样式归一化 → 渲染 PNG 写入 `{output_dir}/{id}.png` → 写入记录。
//! 记录写入失败时删除已生成的 PNG。

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{Result, SmartQrError};
use crate::render::ImageRenderer;
use crate::services::styling::{
    DEFAULT_BACK_COLOR, DEFAULT_FILL_COLOR, StyleOptions, normalize_color, resolve_logo_path,
};
use crate::services::templates::{
    ContactCard, format_calendar_event, format_vcard, format_wifi, parse_event_datetime,
};
use crate::storage::{CodeRecord, CodeSummary, SeaOrmStorage};
use crate::utils::validate_http_url;

fn default_true() -> bool {
    true
}

fn default_encryption() -> String {
    "WPA".to_string()
}

/// 通用创建请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQrRequest {
    #[serde(default)]
    pub name: String,
    pub data: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(flatten)]
    pub style: StyleOptions,
    /// true：图片编码 `{base_url}/r/{id}`，扫码经过跳转并被统计
    #[serde(default = "default_true")]
    pub use_redirect: bool,
}

impl CreateQrRequest {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            redirect_url: None,
            style: StyleOptions::default(),
            use_redirect: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WifiQrRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_encryption")]
    pub encryption: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(flatten)]
    pub style: StyleOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VcardQrRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub card: ContactCard,
    #[serde(flatten)]
    pub style: StyleOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarQrRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub style: StyleOptions,
}

fn name_or(name: Option<&str>, default: &str) -> String {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(default)
        .to_string()
}

pub struct QrService {
    storage: Arc<SeaOrmStorage>,
    renderer: Arc<dyn ImageRenderer>,
    base_url: String,
    output_dir: PathBuf,
    asset_root: PathBuf,
}

impl QrService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        renderer: Arc<dyn ImageRenderer>,
        base_url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        asset_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage,
            renderer,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            output_dir: output_dir.into(),
            asset_root: asset_root.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 生成图片的磁盘路径
    pub fn image_path(&self, id: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", id))
    }

    /// 扫码跳转地址
    pub fn redirect_link(&self, id: &str) -> String {
        format!("{}/r/{}", self.base_url, id)
    }

    pub async fn create(&self, req: CreateQrRequest) -> Result<CodeRecord> {
        let data = req.data.trim();
        if data.is_empty() {
            return Err(SmartQrError::invalid_input("data cannot be empty"));
        }

        let fill_color = normalize_color(req.style.fill_color.as_deref(), DEFAULT_FILL_COLOR)?;
        let back_color = normalize_color(req.style.back_color.as_deref(), DEFAULT_BACK_COLOR)?;
        let logo = resolve_logo_path(req.style.logo_path.as_deref(), &self.asset_root);

        let redirect_target = match req.redirect_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => validate_http_url(url)?,
            _ => data.to_string(),
        };

        let id = Uuid::new_v4().to_string();
        let encoded = if req.use_redirect {
            self.redirect_link(&id)
        } else {
            data.to_string()
        };

        let png = self
            .render_png(encoded, fill_color.clone(), back_color.clone(), logo.clone())
            .await?;

        let image_path = self.image_path(&id);
        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            SmartQrError::file_operation(format!(
                "无法创建输出目录 {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;
        tokio::fs::write(&image_path, &png).await.map_err(|e| {
            SmartQrError::file_operation(format!("写入 {} 失败: {}", image_path.display(), e))
        })?;

        let record = CodeRecord {
            id,
            name: name_or(Some(&req.name), "Untitled"),
            payload: data.to_string(),
            redirect_target: Some(redirect_target),
            fill_color,
            back_color,
            logo_reference: logo.map(|p| p.to_string_lossy().into_owned()),
            created_at: Utc::now(),
        };

        if let Err(e) = self.storage.insert_code(&record).await {
            if let Err(rm) = tokio::fs::remove_file(&image_path).await {
                warn!("清理孤立图片 {} 失败: {}", image_path.display(), rm);
            }
            return Err(e);
        }

        info!(
            "QR code created: {} ({}), redirect={}",
            record.id, record.name, req.use_redirect
        );
        Ok(record)
    }

    async fn render_png(
        &self,
        encoded: String,
        fill_color: String,
        back_color: String,
        logo: Option<PathBuf>,
    ) -> Result<Vec<u8>> {
        let renderer = self.renderer.clone();
        tokio::task::spawn_blocking(move || {
            renderer.render(&encoded, &fill_color, &back_color, logo.as_deref())
        })
        .await
        .map_err(|e| SmartQrError::render(format!("渲染任务失败: {}", e)))?
    }

    /// 结构化二维码：文本直接编码进图片，不经过跳转
    async fn create_structured(
        &self,
        name: String,
        payload: String,
        style: StyleOptions,
    ) -> Result<CodeRecord> {
        self.create(CreateQrRequest {
            name,
            data: payload,
            redirect_url: None,
            style,
            use_redirect: false,
        })
        .await
    }

    pub async fn create_wifi(&self, req: WifiQrRequest) -> Result<CodeRecord> {
        if req.ssid.trim().is_empty() {
            return Err(SmartQrError::invalid_input("SSID is required"));
        }
        let payload = format_wifi(&req.ssid, &req.password, &req.encryption, req.hidden);
        self.create_structured(name_or(req.name.as_deref(), "WiFi"), payload, req.style)
            .await
    }

    pub async fn create_vcard(&self, req: VcardQrRequest) -> Result<CodeRecord> {
        if req.card.first_name.trim().is_empty() {
            return Err(SmartQrError::invalid_input("First name is required"));
        }
        let payload = format_vcard(&req.card);
        self.create_structured(name_or(req.name.as_deref(), "Contact"), payload, req.style)
            .await
    }

    pub async fn create_calendar(&self, req: CalendarQrRequest) -> Result<CodeRecord> {
        if req.summary.trim().is_empty() || req.start.trim().is_empty() || req.end.trim().is_empty()
        {
            return Err(SmartQrError::invalid_input(
                "Summary, start, and end are required",
            ));
        }
        let start = parse_event_datetime(&req.start)?;
        let end = parse_event_datetime(&req.end)?;
        if end < start {
            return Err(SmartQrError::invalid_input(
                "Event end must not be earlier than start",
            ));
        }

        let payload =
            format_calendar_event(&req.summary, &start, &end, &req.location, &req.description);
        self.create_structured(name_or(req.name.as_deref(), "Event"), payload, req.style)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<CodeRecord> {
        self.storage
            .get_code(id)
            .await?
            .ok_or_else(|| SmartQrError::not_found(format!("QR code not found: {}", id)))
    }

    /// 按创建时间倒序，附带扫码数
    pub async fn list(&self) -> Result<Vec<CodeSummary>> {
        self.storage.list_code_summaries().await
    }

    /// 删除记录与其扫码事件（同一事务），然后删除图片
    pub async fn delete(&self, id: &str) -> Result<u64> {
        let removed_events = self.storage.delete_code(id).await?;

        let image_path = self.image_path(id);
        match tokio::fs::remove_file(&image_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("删除图片 {} 失败: {}", image_path.display(), e),
        }

        Ok(removed_events)
    }
}
