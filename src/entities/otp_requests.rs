use sea_orm::entity::prelude::*;

use crate::models::VerificationRecord;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "otp_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub identifier: String,
    pub code: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub resend_count: i32,
    pub is_resend: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for VerificationRecord {
    fn from(m: Model) -> Self {
        VerificationRecord {
            identifier: m.identifier,
            code: m.code,
            created_at: m.created_at,
            expires_at: m.expires_at,
            resend_count: m.resend_count,
            is_resend: m.is_resend,
        }
    }
}
