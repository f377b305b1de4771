use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Why a submitted code was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyFailure {
    NotFound,
    Expired,
    Invalid,
}

impl VerifyFailure {
    pub fn code(&self) -> &'static str {
        match self {
            VerifyFailure::NotFound => "OTP_NOT_FOUND",
            VerifyFailure::Expired => "OTP_EXPIRED",
            VerifyFailure::Invalid => "OTP_INVALID",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            VerifyFailure::NotFound => "No OTP found. Please request a new one.",
            VerifyFailure::Expired => "OTP expired. Please request a new one.",
            VerifyFailure::Invalid => "Invalid code. Please try again.",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Rate limited: retry in {wait_time}s")]
    RateLimited { wait_time: i64, resend: bool },

    #[error("Verification failed: {}", .0.message())]
    Verification(VerifyFailure),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    /// Delivery to a caller-supplied recipient failed, most likely a bad number.
    #[error("Recipient unreachable: {0}")]
    Undeliverable(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Builds the JSON error response, using `fallback` as the public message
    /// for server-side failures so their detail stays in the logs.
    pub fn to_response(&self, fallback: &str) -> HttpResponse {
        match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                error_body(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
            }
            AppError::RateLimited { wait_time, resend } => {
                let action = if *resend {
                    "resending"
                } else {
                    "requesting another OTP"
                };
                HttpResponse::TooManyRequests().json(json!({
                    "success": false,
                    "error": format!("Please wait {wait_time} seconds before {action}"),
                    "code": "RATE_LIMITED",
                    "waitTime": wait_time,
                }))
            }
            AppError::Verification(failure) => {
                error_body(StatusCode::BAD_REQUEST, failure.code(), failure.message())
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                error_body(
                    StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    "Unauthorized: Invalid or missing API key",
                )
            }
            AppError::DeliveryFailed(msg) => {
                log::error!("Delivery failed: {msg}");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "DELIVERY_FAILED", fallback)
            }
            AppError::Undeliverable(msg) => {
                log::warn!("Recipient unreachable: {msg}");
                error_body(
                    StatusCode::BAD_REQUEST,
                    "UNDELIVERABLE",
                    "Invalid Number or WhatsApp Error",
                )
            }
            AppError::StorageUnavailable(msg) => {
                log::error!("Storage unavailable: {msg}");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_UNAVAILABLE",
                    fallback,
                )
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", fallback)
            }
            _ => {
                log::error!("Internal error: {self}");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", fallback)
            }
        }
    }
}

fn error_body(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "error": message,
        "code": code,
    }))
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::Verification(_)
            | AppError::Undeliverable(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response("Internal server error")
    }
}
