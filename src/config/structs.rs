use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// 设备分类策略
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    EnumIter,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeviceClassifierKind {
    /// User-Agent 关键字匹配（mobile/android/iphone, tablet/ipad）
    #[default]
    Keyword,
    /// woothee 解析出的设备类别
    Woothee,
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接配置
/// - qr: 二维码生成配置（base_url、输出目录等）
/// - tracking: 扫码追踪配置
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SMARTQR，分隔符：__
    /// 示例：SMARTQR__SERVER__PORT=9999
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// 同 [`StaticConfig::load`]，可指定配置文件路径
    pub fn load_from(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 SMARTQR，分隔符 __
            .add_source(
                Environment::with_prefix("SMARTQR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// 二维码中编码的跳转地址前缀
    ///
    /// 未配置 `qr.base_url` 时使用 `http://{host}:{port}`，末尾不带斜杠。
    pub fn resolved_base_url(&self) -> String {
        match self.qr.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", self.server.host, self.server.port),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 二维码生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
    /// 编码进二维码的跳转地址前缀，例如 http://192.168.1.10:8000
    #[serde(default)]
    pub base_url: Option<String>,
    /// PNG 输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// 相对 logo 路径的解析根目录
    #[serde(default = "default_asset_root")]
    pub asset_root: String,
    /// 每个模块的像素尺寸
    #[serde(default = "default_module_size")]
    pub module_size: u32,
    #[serde(default = "default_quiet_zone")]
    pub quiet_zone: bool,
}

/// 扫码追踪配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackingConfig {
    #[serde(default)]
    pub device_classifier: DeviceClassifierKind,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "smartqr.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_output_dir() -> String {
    "static/qrcodes".to_string()
}

fn default_asset_root() -> String {
    ".".to_string()
}

fn default_module_size() -> u32 {
    10
}

fn default_quiet_zone() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            output_dir: default_output_dir(),
            asset_root: default_asset_root(),
            module_size: default_module_size(),
            quiet_zone: default_quiet_zone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_base_url_defaults_to_server_address() {
        let config = StaticConfig::default();
        assert_eq!(config.resolved_base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_resolved_base_url_strips_trailing_slash() {
        let mut config = StaticConfig::default();
        config.qr.base_url = Some("https://qr.example.com/".to_string());
        assert_eq!(config.resolved_base_url(), "https://qr.example.com");

        config.qr.base_url = Some("   ".to_string());
        assert_eq!(config.resolved_base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("[qr]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.qr.output_dir, "static/qrcodes");
        assert_eq!(parsed.tracking.device_classifier, DeviceClassifierKind::Keyword);
    }

    #[test]
    fn test_device_classifier_kind_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(
            DeviceClassifierKind::from_str("WOOTHEE").unwrap(),
            DeviceClassifierKind::Woothee
        );
        assert_eq!(DeviceClassifierKind::Keyword.as_ref(), "keyword");
    }
}
