//! Scan event entity, one row per resolved scan

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "scan_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub qr_id: String,
    pub scanned_at: DateTimeUtc,
    pub ip_address: Option<String>,
    /// mobile / tablet / desktop，未知时为 NULL
    pub device_type: Option<String>,
    /// 预留字段，默认不做地理解析
    pub country: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
