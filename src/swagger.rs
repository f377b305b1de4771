use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::otp::send_otp,
        handlers::otp::verify_otp,
        handlers::appointment::web_request,
        handlers::appointment::confirm_appointment,
        handlers::appointment::walk_in,
        handlers::status::health,
    ),
    components(
        schemas(
            SendOtpRequest,
            VerifyOtpRequest,
            WebInquiryRequest,
            ConfirmAppointmentRequest,
            WalkInRequest,
            SuccessResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "otp", description = "One-time verification code API"),
        (name = "appointments", description = "Appointment notifications over WhatsApp"),
        (name = "status", description = "Liveness"),
    ),
    info(
        title = "OTP Gateway API",
        version = "0.1.0",
        description = "Phone verification codes for the hospital web and messaging front-ends",
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_otp_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/send-otp"));
        assert!(doc.paths.paths.contains_key("/verify-otp"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/web-request"));
        assert!(doc.paths.paths.contains_key("/confirm-appointment"));
        assert!(doc.paths.paths.contains_key("/walk-in"));
    }
}
