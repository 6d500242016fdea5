//! 二维码记录表迁移

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QrCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QrCodes::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QrCodes::Name).string_len(255).not_null())
                    .col(ColumnDef::new(QrCodes::OriginalData).text().not_null())
                    .col(ColumnDef::new(QrCodes::RedirectUrl).text().null())
                    .col(
                        ColumnDef::new(QrCodes::FillColor)
                            .string_len(50)
                            .not_null()
                            .default("black"),
                    )
                    .col(
                        ColumnDef::new(QrCodes::BackColor)
                            .string_len(50)
                            .not_null()
                            .default("white"),
                    )
                    .col(ColumnDef::new(QrCodes::LogoPath).string_len(500).null())
                    .col(
                        ColumnDef::new(QrCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 列表按创建时间倒序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qr_codes_created_at")
                    .table(QrCodes::Table)
                    .col(QrCodes::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_qr_codes_created_at")
                    .table(QrCodes::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(QrCodes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum QrCodes {
    #[sea_orm(iden = "qr_codes")]
    Table,
    Id,
    Name,
    OriginalData,
    RedirectUrl,
    FillColor,
    BackColor,
    LogoPath,
    CreatedAt,
}
