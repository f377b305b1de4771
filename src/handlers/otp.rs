use actix_web::{HttpResponse, Result, web};

use crate::error::{AppError, VerifyFailure};
use crate::models::*;
use crate::services::VerificationService;

#[utoipa::path(
    post,
    path = "/send-otp",
    tag = "otp",
    request_body = SendOtpRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "OTP sent or resent", body = MessageResponse),
        (status = 400, description = "Phone number missing", body = ErrorResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
        (status = 429, description = "Cooldown still running", body = ErrorResponse),
        (status = 500, description = "Delivery or storage failure", body = ErrorResponse)
    )
)]
pub async fn send_otp(
    service: web::Data<VerificationService>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse> {
    let phone = request.phone.as_deref().unwrap_or_default();
    let is_resend = request.is_resend.unwrap_or(false);

    match service.request_code(phone, is_resend).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(MessageResponse::ok(outcome.message()))),
        Err(e) => Ok(e.to_response("Failed to send OTP")),
    }
}

#[utoipa::path(
    post,
    path = "/verify-otp",
    tag = "otp",
    request_body = VerifyOtpRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Code accepted", body = MessageResponse),
        (status = 400, description = "Missing fields, no code, expired or wrong code", body = ErrorResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn verify_otp(
    service: web::Data<VerificationService>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse> {
    let phone = request.phone.as_deref().unwrap_or_default();
    let user_code = request.user_code.as_deref().unwrap_or_default();

    let failure = match service.verify_code(phone, user_code).await {
        Ok(VerifyOutcome::Verified) => {
            return Ok(HttpResponse::Ok().json(MessageResponse::ok("Verified Successfully!")));
        }
        Ok(VerifyOutcome::NotFound) => AppError::Verification(VerifyFailure::NotFound),
        Ok(VerifyOutcome::Expired) => AppError::Verification(VerifyFailure::Expired),
        Ok(VerifyOutcome::Invalid) => AppError::Verification(VerifyFailure::Invalid),
        Err(e) => e,
    };
    Ok(failure.to_response("Verification failed"))
}

pub fn otp_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/send-otp", web::post().to(send_otp))
        .route("/verify-otp", web::post().to(verify_otp));
}
