//! SmartQR - Dynamic QR codes with redirect tracking and scan analytics
//!
//! 二维码图片编码 `{base_url}/r/{id}`，扫码时记录一条扫码事件再 302 到目标地址，
//! 统计按二维码聚合总扫码数、按天分布与独立访客。
//!
//! # Architecture
//! - `storage`: sea-orm 存储（二维码记录与扫码事件）
//! - `render`: PNG 渲染（颜色、logo）
//! - `services`: 创建、扫码解析、统计
//! - `api`: HTTP 路由与中间件
//! - `interfaces`: CLI 命令
//! - `config`: 静态配置
//! - `runtime`: 启动组装与运行模式
//! - `system`: 日志

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod render;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
