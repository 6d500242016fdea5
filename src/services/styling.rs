//! 二维码样式：颜色与 logo 路径
//!
//! 颜色支持常用 CSS 颜色名和 `#rgb` / `#rrggbb`。

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::{Result, SmartQrError};

pub const DEFAULT_FILL_COLOR: &str = "black";
pub const DEFAULT_BACK_COLOR: &str = "white";

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("lime", [0, 255, 0]),
    ("aqua", [0, 255, 255]),
    ("cyan", [0, 255, 255]),
    ("fuchsia", [255, 0, 255]),
    ("magenta", [255, 0, 255]),
    ("brown", [165, 42, 42]),
    ("pink", [255, 192, 203]),
    ("darkblue", [0, 0, 139]),
    ("darkgreen", [0, 100, 0]),
    ("darkred", [139, 0, 0]),
];

/// 创建请求里的可选样式字段
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub fill_color: Option<String>,
    pub back_color: Option<String>,
    pub logo_path: Option<String>,
}

/// 颜色名或十六进制 → RGB
pub fn parse_color(color: &str) -> Option<[u8; 3]> {
    let c = color.trim().to_lowercase();

    if let Some(hex) = c.strip_prefix('#') {
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, ch) in hex.chars().enumerate() {
                    let v = ch.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(rgb)
            }
            6 => Some([
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            ]),
            _ => None,
        };
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == c)
        .map(|(_, rgb)| *rgb)
}

/// 空值用默认色；非空值必须能解析，返回去空白、小写后的写法
pub fn normalize_color(color: Option<&str>, default: &str) -> Result<String> {
    match color.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(default.to_string()),
        Some(c) => {
            if parse_color(c).is_some() {
                Ok(c.to_lowercase())
            } else {
                Err(SmartQrError::invalid_input(format!(
                    "Invalid color '{}': use a color name or #rgb / #rrggbb",
                    c
                )))
            }
        }
    }
}

/// 解析 logo 路径：相对路径基于 asset_root
///
/// 文件不存在，或规范化后落在 asset_root 之外（绝对路径、`..`、符号链接）时返回 None。
pub fn resolve_logo_path(logo_path: Option<&str>, asset_root: &Path) -> Option<PathBuf> {
    let raw = logo_path.map(str::trim).filter(|p| !p.is_empty())?;

    let root = match asset_root.canonicalize() {
        Ok(root) => root,
        Err(e) => {
            warn!("Asset root {} unavailable: {}", asset_root.display(), e);
            return None;
        }
    };

    let resolved = match root.join(raw).canonicalize() {
        Ok(path) => path,
        Err(_) => {
            warn!("Logo not found, ignoring: {}", raw);
            return None;
        }
    };

    if !resolved.starts_with(&root) {
        warn!("Logo outside asset root, ignoring: {}", raw);
        return None;
    }

    if resolved.is_file() {
        debug!("Logo resolved: {}", resolved.display());
        Some(resolved)
    } else {
        warn!("Logo is not a file, ignoring: {}", raw);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("black"), Some([0, 0, 0]));
        assert_eq!(parse_color(" Navy "), Some([0, 0, 128]));
        assert_eq!(parse_color("#fff"), Some([255, 255, 255]));
        assert_eq!(parse_color("#1A2b3C"), Some([0x1a, 0x2b, 0x3c]));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#ggg"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color(None, DEFAULT_FILL_COLOR).unwrap(), "black");
        assert_eq!(normalize_color(Some("  "), DEFAULT_BACK_COLOR).unwrap(), "white");
        assert_eq!(normalize_color(Some("#FF0000"), "black").unwrap(), "#ff0000");
        assert!(matches!(
            normalize_color(Some("notacolor"), "black"),
            Err(SmartQrError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_logo_path() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("logos")).unwrap();
        std::fs::write(dir.path().join("logos/logo.png"), b"x").unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(
            resolve_logo_path(Some("logos/logo.png"), dir.path()),
            Some(root.join("logos/logo.png"))
        );
        // 仍在根目录内的 `..` 可以接受
        assert_eq!(
            resolve_logo_path(Some("logos/../logos/logo.png"), dir.path()),
            Some(root.join("logos/logo.png"))
        );
        assert_eq!(resolve_logo_path(Some("missing.png"), dir.path()), None);
        assert_eq!(resolve_logo_path(Some("logos"), dir.path()), None);
        assert_eq!(resolve_logo_path(Some("  "), dir.path()), None);
        assert_eq!(resolve_logo_path(None, dir.path()), None);
    }

    #[test]
    fn test_resolve_logo_path_stays_under_asset_root() {
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret.png"), b"x").unwrap();
        let root = TempDir::new().unwrap();

        let absolute = outside.path().join("secret.png");
        assert_eq!(resolve_logo_path(absolute.to_str(), root.path()), None);

        let outside_name = outside.path().file_name().unwrap().to_str().unwrap();
        let traversal = format!("../{}/secret.png", outside_name);
        assert_eq!(resolve_logo_path(Some(&traversal), root.path()), None);
    }
}
