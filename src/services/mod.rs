//! Service layer for business logic
//!
//! HTTP 路由和 CLI 共用的业务逻辑：创建、扫码解析、统计。

mod analytics_service;
pub mod device;
mod qr_service;
mod redirect;
pub mod styling;
pub mod templates;

pub use analytics_service::*;
pub use device::{DeviceClassifier, KeywordDeviceClassifier, WootheeDeviceClassifier, classifier_for};
pub use qr_service::*;
pub use redirect::{RedirectResolver, RequestMetadata};
