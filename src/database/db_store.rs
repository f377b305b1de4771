use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::store::VerificationStore;
use crate::entities::otp_request_entity as otp_requests;
use crate::error::{AppError, AppResult};
use crate::models::VerificationRecord;

/// Postgres-backed store over the `otp_requests` table.
#[derive(Clone)]
pub struct DbStore {
    pool: DatabaseConnection,
}

impl DbStore {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sea_orm::DbErr) -> AppError {
    AppError::StorageUnavailable(err.to_string())
}

#[async_trait]
impl VerificationStore for DbStore {
    async fn get(&self, identifier: &str) -> AppResult<Option<VerificationRecord>> {
        let row = otp_requests::Entity::find_by_id(identifier.to_string())
            .one(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(row.map(VerificationRecord::from))
    }

    async fn put(&self, record: &VerificationRecord) -> AppResult<()> {
        let am = otp_requests::ActiveModel {
            identifier: Set(record.identifier.clone()),
            code: Set(record.code.clone()),
            created_at: Set(record.created_at),
            expires_at: Set(record.expires_at),
            resend_count: Set(record.resend_count),
            is_resend: Set(record.is_resend),
        };

        otp_requests::Entity::insert(am)
            .on_conflict(
                OnConflict::column(otp_requests::Column::Identifier)
                    .update_columns([
                        otp_requests::Column::Code,
                        otp_requests::Column::CreatedAt,
                        otp_requests::Column::ExpiresAt,
                        otp_requests::Column::ResendCount,
                        otp_requests::Column::IsResend,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn delete(&self, identifier: &str) -> AppResult<()> {
        otp_requests::Entity::delete_by_id(identifier.to_string())
            .exec(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn purge_expired(&self, now_ms: i64) -> AppResult<u64> {
        let res = otp_requests::Entity::delete_many()
            .filter(otp_requests::Column::ExpiresAt.lt(now_ms))
            .exec(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(res.rows_affected)
    }
}
