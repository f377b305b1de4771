use std::sync::Arc;

use crate::config::AppointmentConfig;
use crate::error::{AppError, AppResult};
use crate::external::{DeliveryChannel, send_within};
use crate::models::*;

const DEFAULT_BOOKING_REASON: &str = "Web Booking Confirmed";
const DEFAULT_WALK_IN_REASON: &str = "Walk-in";

/// Appointment notifications to patients, doctors and the front desk.
#[derive(Clone)]
pub struct AppointmentService {
    delivery: Arc<dyn DeliveryChannel>,
    config: AppointmentConfig,
    delivery_timeout_ms: u64,
}

impl AppointmentService {
    pub fn new(
        delivery: Arc<dyn DeliveryChannel>,
        config: AppointmentConfig,
        delivery_timeout_ms: u64,
    ) -> Self {
        Self {
            delivery,
            config,
            delivery_timeout_ms,
        }
    }

    /// Acknowledges a web inquiry to the patient, then alerts the front desk.
    ///
    /// The front desk is alerted only after the acknowledgement went out. A failed
    /// acknowledgement is reported as `Undeliverable` since the number came from
    /// the caller.
    pub async fn web_inquiry(&self, request: &WebInquiryRequest) -> AppResult<()> {
        let patient_phone = required(&request.patient_phone, "Patient phone required")?;
        if self.config.receptionist_phone.is_empty() {
            return Err(AppError::ConfigError(
                "receptionist_phone is not configured".to_string(),
            ));
        }
        let patient_name = text(&request.patient_name);
        let doctor_name = text(&request.doctor_name);

        self.notify(
            patient_phone,
            &self.config.patient_ack_template,
            vec![patient_name.clone(), doctor_name.clone()],
        )
        .await
        .map_err(|e| AppError::Undeliverable(format!("{patient_phone}: {e}")))?;

        self.notify(
            &self.config.receptionist_phone,
            &self.config.staff_alert_template,
            vec![
                patient_name,
                patient_phone.to_string(),
                doctor_name,
                text(&request.date),
            ],
        )
        .await?;

        log::info!("Web inquiry from {patient_phone} forwarded to front desk");
        Ok(())
    }

    /// Confirms a booking to the patient and, when a doctor number is given, to
    /// the doctor. Returns whether the doctor was notified.
    pub async fn confirm_appointment(&self, request: &ConfirmAppointmentRequest) -> AppResult<bool> {
        let patient_phone = required(&request.patient_phone, "Patient phone required")?;
        let patient_name = text(&request.patient_name);
        let doctor_name = text(&request.doctor_name);
        let date = text(&request.date);
        let time = text(&request.time);

        self.notify(
            patient_phone,
            &self.config.confirm_template,
            vec![patient_name.clone(), doctor_name.clone(), date.clone(), time.clone()],
        )
        .await?;

        let Some(doctor_phone) = request.doctor_phone.as_deref().filter(|p| !p.is_empty()) else {
            log::info!("Appointment confirmed to {patient_phone}");
            return Ok(false);
        };

        let reason = request
            .reason
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_BOOKING_REASON.to_string());
        self.notify(
            doctor_phone,
            &self.config.doctor_alert_template,
            vec![doctor_name, patient_name, date, time, reason],
        )
        .await?;

        log::info!("Appointment confirmed to {patient_phone} and {doctor_phone}");
        Ok(true)
    }

    /// Tells the doctor about a walk-in patient.
    pub async fn walk_in(&self, request: &WalkInRequest) -> AppResult<()> {
        let doctor_phone = required(&request.doctor_phone, "Doctor phone required")?;
        let reason = request
            .reason
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_WALK_IN_REASON.to_string());

        self.notify(
            doctor_phone,
            &self.config.doctor_alert_template,
            vec![
                text(&request.doctor_name),
                text(&request.patient_name),
                text(&request.date),
                text(&request.time),
                reason,
            ],
        )
        .await?;

        log::info!("Walk-in alert sent to {doctor_phone}");
        Ok(())
    }

    async fn notify(&self, to: &str, template: &str, params: Vec<String>) -> AppResult<()> {
        send_within(
            self.delivery.as_ref(),
            self.delivery_timeout_ms,
            to,
            template,
            &params,
            &[],
        )
        .await
    }
}

fn required<'a>(value: &'a Option<String>, message: &str) -> AppResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::ValidationError(message.to_string())),
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
