use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fields are optional so a missing value reaches the service and is reported
/// as a validation error instead of a body parse failure.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[schema(example = "+911234567890")]
    pub phone: Option<String>,
    pub is_resend: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[schema(example = "+911234567890")]
    pub phone: Option<String>,
    #[schema(example = "482913")]
    pub user_code: Option<String>,
}

/// Successful issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOutcome {
    Sent,
    Resent,
}

impl IssueOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            IssueOutcome::Sent => "OTP sent",
            IssueOutcome::Resent => "OTP resent",
        }
    }
}

/// Result of checking a submitted code against the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    Invalid,
    Expired,
    NotFound,
}
