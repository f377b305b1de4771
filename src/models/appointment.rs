use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Booking inquiry from the website.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebInquiryRequest {
    #[schema(example = "Asha Rao")]
    pub patient_name: Option<String>,
    #[schema(example = "+911234567890")]
    pub patient_phone: Option<String>,
    #[schema(example = "Dr. Mehta")]
    pub doctor_name: Option<String>,
    #[schema(example = "2025-09-14")]
    pub date: Option<String>,
}

/// Confirmed booking; the doctor is notified only when `doctorPhone` is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmAppointmentRequest {
    pub patient_name: Option<String>,
    pub patient_phone: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_phone: Option<String>,
    pub date: Option<String>,
    #[schema(example = "10:30")]
    pub time: Option<String>,
    pub reason: Option<String>,
}

/// Patient registered at the front desk without a prior booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalkInRequest {
    pub doctor_name: Option<String>,
    pub patient_name: Option<String>,
    pub doctor_phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}
