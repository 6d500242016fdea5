//! 扫码事件表迁移
//!
//! scan_events 只追加不修改。外键不做级联删除：
//! 删除二维码时由应用层在同一事务内先删事件、再删记录。

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_qr_codes::QrCodes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScanEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScanEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScanEvents::QrId).string_len(36).not_null())
                    .col(
                        ColumnDef::new(ScanEvents::ScannedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScanEvents::IpAddress).string_len(45).null())
                    .col(ColumnDef::new(ScanEvents::DeviceType).string_len(100).null())
                    .col(ColumnDef::new(ScanEvents::Country).string_len(100).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scan_events_qr_id")
                            .from(ScanEvents::Table, ScanEvents::QrId)
                            .to(QrCodes::Table, QrCodes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 单码统计查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scan_events_qr_id")
                    .table(ScanEvents::Table)
                    .col(ScanEvents::QrId)
                    .to_owned(),
            )
            .await?;

        // 按天分组
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scan_events_qr_time")
                    .table(ScanEvents::Table)
                    .col(ScanEvents::QrId)
                    .col(ScanEvents::ScannedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scan_events_qr_time")
                    .table(ScanEvents::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_scan_events_qr_id")
                    .table(ScanEvents::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ScanEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScanEvents {
    #[sea_orm(iden = "scan_events")]
    Table,
    Id,
    QrId,
    ScannedAt,
    IpAddress,
    DeviceType,
    Country,
}
