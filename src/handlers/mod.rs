pub mod appointment;
pub mod otp;
pub mod status;

use actix_web::{HttpResponse, error::InternalError, web};
use serde_json::json;

pub use appointment::appointment_config;
pub use otp::otp_config;
pub use status::status_config;

/// JSON extractor settings: malformed bodies get the same error shape as the handlers.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            log::warn!("Rejected request body: {err}");
            let response = HttpResponse::BadRequest().json(json!({
                "success": false,
                "error": "Invalid request body",
                "code": "VALIDATION_ERROR",
            }));
            InternalError::from_response(err, response).into()
        })
}
