use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum SmartQrError {
    /// 引用的二维码不存在
    NotFound(String),
    /// 创建参数为空或格式错误（日期、颜色、模板字段等）
    InvalidInput(String),
    /// 记录既没有跳转地址也没有原始数据
    InvalidState(String),
    /// 持久化操作失败
    StoreFailure(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    FileOperation(String),
    Render(String),
    Serialization(String),
}

impl SmartQrError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SmartQrError::NotFound(_) => "E001",
            SmartQrError::InvalidInput(_) => "E002",
            SmartQrError::InvalidState(_) => "E003",
            SmartQrError::StoreFailure(_) => "E004",
            SmartQrError::DatabaseConfig(_) => "E005",
            SmartQrError::DatabaseConnection(_) => "E006",
            SmartQrError::FileOperation(_) => "E007",
            SmartQrError::Render(_) => "E008",
            SmartQrError::Serialization(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SmartQrError::NotFound(_) => "Resource Not Found",
            SmartQrError::InvalidInput(_) => "Invalid Input",
            SmartQrError::InvalidState(_) => "Invalid State",
            SmartQrError::StoreFailure(_) => "Store Failure",
            SmartQrError::DatabaseConfig(_) => "Database Configuration Error",
            SmartQrError::DatabaseConnection(_) => "Database Connection Error",
            SmartQrError::FileOperation(_) => "File Operation Error",
            SmartQrError::Render(_) => "Render Error",
            SmartQrError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SmartQrError::NotFound(msg)
            | SmartQrError::InvalidInput(msg)
            | SmartQrError::InvalidState(msg)
            | SmartQrError::StoreFailure(msg)
            | SmartQrError::DatabaseConfig(msg)
            | SmartQrError::DatabaseConnection(msg)
            | SmartQrError::FileOperation(msg)
            | SmartQrError::Render(msg)
            | SmartQrError::Serialization(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            SmartQrError::NotFound(_) => StatusCode::NOT_FOUND,
            SmartQrError::InvalidInput(_) | SmartQrError::InvalidState(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SmartQrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SmartQrError {}

// 便捷的构造函数
impl SmartQrError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SmartQrError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        SmartQrError::InvalidInput(msg.into())
    }

    pub fn invalid_state<T: Into<String>>(msg: T) -> Self {
        SmartQrError::InvalidState(msg.into())
    }

    pub fn store_failure<T: Into<String>>(msg: T) -> Self {
        SmartQrError::StoreFailure(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SmartQrError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SmartQrError::DatabaseConnection(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        SmartQrError::FileOperation(msg.into())
    }

    pub fn render<T: Into<String>>(msg: T) -> Self {
        SmartQrError::Render(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SmartQrError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for SmartQrError {
    fn from(err: sea_orm::DbErr) -> Self {
        SmartQrError::StoreFailure(err.to_string())
    }
}

impl From<std::io::Error> for SmartQrError {
    fn from(err: std::io::Error) -> Self {
        SmartQrError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SmartQrError {
    fn from(err: serde_json::Error) -> Self {
        SmartQrError::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for SmartQrError {
    fn from(err: image::ImageError) -> Self {
        SmartQrError::Render(err.to_string())
    }
}

// 数据超出二维码容量属于输入问题
impl From<qrcode::types::QrError> for SmartQrError {
    fn from(err: qrcode::types::QrError) -> Self {
        SmartQrError::InvalidInput(format!("payload cannot be encoded as QR: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SmartQrError>;
