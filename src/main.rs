use actix_web::{App, HttpServer, middleware::Logger, web};
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use chrono::Local;  // timestamp in log lines
use std::sync::Arc;

use otp_gateway::{
    config::{Config, StorageBackend},
    database::{DbStore, MemoryStore, VerificationStore, create_pool, run_migrations},
    external::{DeliveryChannel, LogDelivery, WhatsAppService},
    handlers,
    middlewares::{ApiKeyMiddleware, create_cors},
    services::{AppointmentService, VerificationService},
    swagger::swagger_config,
    tasks,
    utils::SystemClock,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let store: Arc<dyn VerificationStore> = match config.storage.backend {
        StorageBackend::Memory => {
            log::warn!("Using in-memory OTP store; codes are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            Arc::new(DbStore::new(pool))
        }
    };

    let (delivery, template): (Arc<dyn DeliveryChannel>, String) = if config.whatsapp.is_enabled() {
        (
            Arc::new(WhatsAppService::new(config.whatsapp.clone())),
            config.whatsapp.otp_template.clone(),
        )
    } else {
        log::warn!("WhatsApp is not configured; OTPs will only be logged");
        (Arc::new(LogDelivery), "otp".to_string())
    };

    let verification_service = VerificationService::new(
        store,
        delivery.clone(),
        Arc::new(SystemClock),
        config.otp.clone(),
        template,
    );

    let appointment_service = AppointmentService::new(
        delivery,
        config.appointments.clone(),
        config.otp.delivery_timeout_ms,
    );
    if config.appointments.receptionist_phone.is_empty() {
        log::warn!("RECEPTIONIST_PHONE is not set; /web-request will fail");
    }

    tasks::spawn_all(verification_service.clone(), &config.otp);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let api_key = config.auth.api_secret_key.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(ApiKeyMiddleware::new(&api_key))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(handlers::json_config())
            .app_data(web::Data::new(verification_service.clone()))
            .app_data(web::Data::new(appointment_service.clone()))
            .configure(swagger_config)
            .configure(handlers::status_config)
            .configure(handlers::otp_config)
            .configure(handlers::appointment_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
