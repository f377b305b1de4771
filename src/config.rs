use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub appointments: AppointmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret expected as `Authorization: Bearer <key>`.
    pub api_secret_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

/// Verification code timing. All values are whole seconds or milliseconds as named.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    pub code_ttl_secs: i64,
    pub request_cooldown_secs: i64,
    pub resend_cooldown_secs: i64,
    pub storage_timeout_ms: u64,
    pub delivery_timeout_ms: u64,
    /// 0 disables the expired-record reaper.
    pub reaper_interval_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: 300,
            request_cooldown_secs: 60,
            resend_cooldown_secs: 30,
            storage_timeout_ms: 5_000,
            delivery_timeout_ms: 10_000,
            reaper_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    pub api_base: String,
    pub phone_number_id: String,
    pub access_token: String,
    pub otp_template: String,
    pub language_code: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_base: "https://graph.facebook.com/v21.0".to_string(),
            phone_number_id: String::new(),
            access_token: String::new(),
            otp_template: String::new(),
            language_code: "en".to_string(),
        }
    }
}

/// Recipients and template names for appointment notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentConfig {
    /// Front desk number alerted about web inquiries.
    pub receptionist_phone: String,
    pub patient_ack_template: String,
    pub staff_alert_template: String,
    pub confirm_template: String,
    pub doctor_alert_template: String,
}

impl Default for AppointmentConfig {
    fn default() -> Self {
        Self {
            receptionist_phone: String::new(),
            patient_ack_template: "patient_ack".to_string(),
            staff_alert_template: "staff_alert".to_string(),
            confirm_template: "appointment_confirm".to_string(),
            doctor_alert_template: "walkin_doctor".to_string(),
        }
    }
}

impl WhatsAppConfig {
    pub fn is_enabled(&self) -> bool {
        !self.access_token.is_empty() && !self.phone_number_id.is_empty()
    }
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // A missing file means env vars and defaults only
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_defaults(),
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Failed to read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {e}")))
    }

    fn from_defaults() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            auth: AuthConfig {
                api_secret_key: String::new(),
            },
            storage: StorageConfig::default(),
            database: DatabaseConfig::default(),
            otp: OtpConfig::default(),
            whatsapp: WhatsAppConfig::default(),
            appointments: AppointmentConfig::default(),
        }
    }

    fn apply_env_overrides(&mut self) {
        fn get_env(name: &str) -> Option<String> {
            env::var(name).ok()
        }
        fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|v| v.parse::<T>().ok())
        }

        if let Some(v) = get_env("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = get_env_parse("SERVER_PORT") {
            self.server.port = p;
        }
        if let Some(v) = get_env("API_SECRET_KEY") {
            self.auth.api_secret_key = v;
        }
        if let Some(b) = get_env_parse("STORAGE_BACKEND") {
            self.storage.backend = b;
        }
        if let Some(v) = get_env("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(mc) = get_env_parse("DB_MAX_CONNECTIONS") {
            self.database.max_connections = mc;
        }
        if let Some(n) = get_env_parse("OTP_CODE_TTL_SECS") {
            self.otp.code_ttl_secs = n;
        }
        if let Some(n) = get_env_parse("OTP_REQUEST_COOLDOWN_SECS") {
            self.otp.request_cooldown_secs = n;
        }
        if let Some(n) = get_env_parse("OTP_RESEND_COOLDOWN_SECS") {
            self.otp.resend_cooldown_secs = n;
        }
        if let Some(n) = get_env_parse("OTP_STORAGE_TIMEOUT_MS") {
            self.otp.storage_timeout_ms = n;
        }
        if let Some(n) = get_env_parse("OTP_DELIVERY_TIMEOUT_MS") {
            self.otp.delivery_timeout_ms = n;
        }
        if let Some(n) = get_env_parse("OTP_REAPER_INTERVAL_SECS") {
            self.otp.reaper_interval_secs = n;
        }
        if let Some(v) = get_env("META_API_BASE") {
            self.whatsapp.api_base = v;
        }
        if let Some(v) = get_env("META_PHONE_ID") {
            self.whatsapp.phone_number_id = v;
        }
        if let Some(v) = get_env("META_TOKEN") {
            self.whatsapp.access_token = v;
        }
        if let Some(v) = get_env("TEMP_OTP") {
            self.whatsapp.otp_template = v;
        }
        if let Some(v) = get_env("META_LANGUAGE_CODE") {
            self.whatsapp.language_code = v;
        }
        if let Some(v) = get_env("RECEPTIONIST_PHONE") {
            self.appointments.receptionist_phone = v;
        }
        if let Some(v) = get_env("TEMP_PATIENT_ACK") {
            self.appointments.patient_ack_template = v;
        }
        if let Some(v) = get_env("TEMP_STAFF_ALERT") {
            self.appointments.staff_alert_template = v;
        }
        if let Some(v) = get_env("TEMP_CONFIRM") {
            self.appointments.confirm_template = v;
        }
        if let Some(v) = get_env("TEMP_WALKIN_DOC") {
            self.appointments.doctor_alert_template = v;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.auth.api_secret_key.trim().is_empty() {
            return Err(AppError::ConfigError(
                "API_SECRET_KEY must be set (auth.api_secret_key)".to_string(),
            ));
        }
        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::ConfigError(
                "DATABASE_URL is required for the postgres storage backend".to_string(),
            ));
        }
        if self.otp.code_ttl_secs <= 0
            || self.otp.request_cooldown_secs <= 0
            || self.otp.resend_cooldown_secs <= 0
        {
            return Err(AppError::ConfigError(
                "OTP ttl and cooldowns must be positive".to_string(),
            ));
        }
        if self.whatsapp.is_enabled() && self.whatsapp.otp_template.is_empty() {
            return Err(AppError::ConfigError(
                "TEMP_OTP is required when WhatsApp delivery is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 3000

        [auth]
        api_secret_key = "s3cret"
    "#;

    #[test]
    fn test_parse_minimal_uses_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.otp.code_ttl_secs, 300);
        assert_eq!(config.otp.request_cooldown_secs, 60);
        assert_eq!(config.otp.resend_cooldown_secs, 30);
        assert!(!config.whatsapp.is_enabled());
        assert!(config.appointments.receptionist_phone.is_empty());
        assert_eq!(config.appointments.confirm_template, "appointment_confirm");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [auth]
            api_secret_key = "k"

            [storage]
            backend = "postgres"

            [database]
            url = "postgres://localhost/otp"

            [otp]
            resend_cooldown_secs = 45

            [whatsapp]
            phone_number_id = "123"
            access_token = "tok"
            otp_template = "otp_code"

            [appointments]
            receptionist_phone = "+919800000000"
            doctor_alert_template = "doctor_booking"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.otp.resend_cooldown_secs, 45);
        assert_eq!(config.otp.request_cooldown_secs, 60);
        assert!(config.whatsapp.is_enabled());
        assert_eq!(config.whatsapp.language_code, "en");
        assert_eq!(config.appointments.receptionist_phone, "+919800000000");
        assert_eq!(config.appointments.doctor_alert_template, "doctor_booking");
        assert_eq!(config.appointments.patient_ack_template, "patient_ack");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let mut config = Config::parse(MINIMAL).unwrap();
        config.auth.api_secret_key = "  ".to_string();
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_postgres_without_url() {
        let mut config = Config::parse(MINIMAL).unwrap();
        config.storage.backend = StorageBackend::Postgres;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_whatsapp_without_template() {
        let mut config = Config::parse(MINIMAL).unwrap();
        config.whatsapp.phone_number_id = "1".to_string();
        config.whatsapp.access_token = "t".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_language_code() {
        // No other test reads or writes META_LANGUAGE_CODE
        unsafe { env::set_var("META_LANGUAGE_CODE", "hi") };
        let mut config = Config::parse(MINIMAL).unwrap();
        config.apply_env_overrides();
        unsafe { env::remove_var("META_LANGUAGE_CODE") };
        assert_eq!(config.whatsapp.language_code, "hi");
    }

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("Postgres".parse::<StorageBackend>(), Ok(StorageBackend::Postgres));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("redis".parse::<StorageBackend>().is_err());
    }
}
