use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum OtpRequests {
    Table,
    Identifier,
    Code,
    CreatedAt,
    ExpiresAt,
    ResendCount,
    IsResend,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per identifier; timestamps are epoch milliseconds
        manager
            .create_table(
                Table::create()
                    .table(OtpRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OtpRequests::Identifier)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OtpRequests::Code).string_len(6).not_null())
                    .col(
                        ColumnDef::new(OtpRequests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OtpRequests::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OtpRequests::ResendCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OtpRequests::IsResend)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // The reaper deletes by expiry
        manager
            .create_index(
                Index::create()
                    .name("idx_otp_requests_expires_at")
                    .table(OtpRequests::Table)
                    .col(OtpRequests::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OtpRequests::Table).to_owned())
            .await?;
        Ok(())
    }
}
