//! QR JSON API
//!
//! - `/api/qr` 下的 CRUD、结构化创建与统计
//! - 旧版 `/qr/create`、`/qr/{id}/stats`

mod crud;
pub mod error_code;
mod helpers;
pub mod routes;
mod templated;
mod types;

pub use types::*;

pub use helpers::{
    api_result, error_from_smartqr, error_response, json_config, json_response, success_response,
};

pub use error_code::ErrorCode;

pub use routes::{legacy_qr_routes, qr_api_routes};
