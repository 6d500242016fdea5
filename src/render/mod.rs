//! PNG 渲染
//!
//! qrcode 生成模块矩阵，image 负责上色、叠加 logo 与编码。

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::errors::{Result, SmartQrError};
use crate::services::styling::parse_color;

/// logo 边长占二维码边长的上限
const LOGO_MAX_RATIO: f32 = 0.2;

pub trait ImageRenderer: Send + Sync {
    /// 渲染为 PNG 字节。有 logo 时纠错等级提高到 H，否则为 M。
    fn render(
        &self,
        payload: &str,
        fill_color: &str,
        back_color: &str,
        logo: Option<&Path>,
    ) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    module_size: u32,
    quiet_zone: bool,
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(10, true)
    }
}

impl PngRenderer {
    pub fn new(module_size: u32, quiet_zone: bool) -> Self {
        Self {
            module_size: module_size.max(1),
            quiet_zone,
        }
    }

    fn rgba(color: &str) -> Result<Rgba<u8>> {
        let [r, g, b] = parse_color(color)
            .ok_or_else(|| SmartQrError::invalid_input(format!("Invalid color '{}'", color)))?;
        Ok(Rgba([r, g, b, 255]))
    }

    fn overlay_logo(canvas: &mut RgbaImage, logo_path: &Path) -> Result<()> {
        let logo = image::open(logo_path).map_err(|e| {
            SmartQrError::invalid_input(format!(
                "Logo '{}' cannot be decoded: {}",
                logo_path.display(),
                e
            ))
        })?;

        let side = canvas.width().min(canvas.height());
        let max_side = ((side as f32 * LOGO_MAX_RATIO) as u32).max(1);
        let logo = if logo.width() > max_side || logo.height() > max_side {
            logo.resize(max_side, max_side, FilterType::Lanczos3)
        } else {
            logo
        };
        let logo = logo.to_rgba8();

        let x = (canvas.width() - logo.width()) / 2;
        let y = (canvas.height() - logo.height()) / 2;
        imageops::overlay(canvas, &logo, x as i64, y as i64);

        debug!(
            "Logo overlaid at ({}, {}), size {}x{}",
            x,
            y,
            logo.width(),
            logo.height()
        );
        Ok(())
    }
}

impl ImageRenderer for PngRenderer {
    fn render(
        &self,
        payload: &str,
        fill_color: &str,
        back_color: &str,
        logo: Option<&Path>,
    ) -> Result<Vec<u8>> {
        let ec_level = if logo.is_some() { EcLevel::H } else { EcLevel::M };
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ec_level)?;

        let mut canvas: RgbaImage = code
            .render::<Rgba<u8>>()
            .dark_color(Self::rgba(fill_color)?)
            .light_color(Self::rgba(back_color)?)
            .quiet_zone(self.quiet_zone)
            .module_dimensions(self.module_size, self.module_size)
            .build();

        if let Some(logo_path) = logo {
            Self::overlay_logo(&mut canvas, logo_path)?;
        }

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
