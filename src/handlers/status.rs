use actix_web::{HttpResponse, Result, http::header::ContentType, web};
use serde_json::json;

const STATUS_PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>OTP Gateway | Status</title>
        <style>
            body { font-family: 'Segoe UI', Tahoma, sans-serif; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #f4f7f6; }
            .card { background: white; padding: 2.5rem; border-radius: 15px; box-shadow: 0 10px 25px rgba(0,0,0,0.05); text-align: center; border-top: 6px solid #28a745; max-width: 400px; }
            h1 { color: #2c3e50; margin-bottom: 0.5rem; font-size: 1.8rem; }
            .status-box { background: #e8f5e9; color: #2e7d32; padding: 8px 15px; border-radius: 20px; display: inline-block; font-weight: 600; margin: 15px 0; }
            p { color: #7f8c8d; line-height: 1.6; }
        </style>
    </head>
    <body>
        <div class="card">
            <h1>OTP Gateway</h1>
            <div class="status-box">&#9679; API ONLINE</div>
            <p>The verification service is running and accepting requests.</p>
        </div>
    </body>
</html>
"#;

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(STATUS_PAGE)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "status",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

pub fn status_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health));
}
