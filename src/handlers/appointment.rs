use actix_web::{HttpResponse, Result, web};

use crate::models::*;
use crate::services::AppointmentService;

#[utoipa::path(
    post,
    path = "/web-request",
    tag = "appointments",
    request_body = WebInquiryRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Patient acknowledged and front desk alerted", body = MessageResponse),
        (status = 400, description = "Patient number missing or unreachable", body = ErrorResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
        (status = 500, description = "Front desk alert failed", body = ErrorResponse)
    )
)]
pub async fn web_request(
    service: web::Data<AppointmentService>,
    request: web::Json<WebInquiryRequest>,
) -> Result<HttpResponse> {
    match service.web_inquiry(&request).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::ok("Inquiry processed"))),
        Err(e) => Ok(e.to_response("Failed to process inquiry")),
    }
}

#[utoipa::path(
    post,
    path = "/confirm-appointment",
    tag = "appointments",
    request_body = ConfirmAppointmentRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Confirmation delivered", body = MessageResponse),
        (status = 400, description = "Patient number missing", body = ErrorResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
        (status = 500, description = "WhatsApp delivery failed", body = ErrorResponse)
    )
)]
pub async fn confirm_appointment(
    service: web::Data<AppointmentService>,
    request: web::Json<ConfirmAppointmentRequest>,
) -> Result<HttpResponse> {
    match service.confirm_appointment(&request).await {
        Ok(_) => Ok(HttpResponse::Ok().json(MessageResponse::ok("Confirmation sent to all"))),
        Err(e) => Ok(e.to_response("WhatsApp Send Failed")),
    }
}

#[utoipa::path(
    post,
    path = "/walk-in",
    tag = "appointments",
    request_body = WalkInRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Doctor alerted", body = SuccessResponse),
        (status = 400, description = "Doctor number missing", body = ErrorResponse),
        (status = 401, description = "Missing or wrong API key", body = ErrorResponse),
        (status = 500, description = "WhatsApp delivery failed", body = ErrorResponse)
    )
)]
pub async fn walk_in(
    service: web::Data<AppointmentService>,
    request: web::Json<WalkInRequest>,
) -> Result<HttpResponse> {
    match service.walk_in(&request).await {
        Ok(()) => Ok(HttpResponse::Ok().json(SuccessResponse { success: true })),
        Err(e) => Ok(e.to_response("WhatsApp Send Failed")),
    }
}

pub fn appointment_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/web-request", web::post().to(web_request))
        .route("/confirm-appointment", web::post().to(confirm_appointment))
        .route("/walk-in", web::post().to(walk_in));
}
