//! Appointment notification endpoints through the API-key middleware.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use otp_gateway::config::AppointmentConfig;
use otp_gateway::external::DeliveryChannel;
use otp_gateway::handlers;
use otp_gateway::middlewares::ApiKeyMiddleware;
use otp_gateway::services::AppointmentService;
use otp_gateway::{AppError, AppResult};

const KEY: &str = "test-secret";
const PATIENT: &str = "+911234567890";
const DOCTOR: &str = "+919811111111";
const DESK: &str = "+919800000000";

#[derive(Default)]
struct Outbox {
    recipients: Mutex<Vec<String>>,
    unreachable: HashSet<String>,
}

impl Outbox {
    fn recipients(&self) -> Vec<String> {
        self.recipients.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryChannel for Outbox {
    async fn send(
        &self,
        identifier: &str,
        _template: &str,
        _body: &[String],
        _buttons: &[String],
    ) -> AppResult<()> {
        if self.unreachable.contains(identifier) {
            return Err(AppError::DeliveryFailed("HTTP 400".into()));
        }
        self.recipients.lock().unwrap().push(identifier.to_string());
        Ok(())
    }
}

fn service(outbox: Arc<Outbox>) -> AppointmentService {
    AppointmentService::new(
        outbox,
        AppointmentConfig {
            receptionist_phone: DESK.to_string(),
            ..AppointmentConfig::default()
        },
        10_000,
    )
}

macro_rules! app {
    ($outbox:expr) => {
        test::init_service(
            App::new()
                .wrap(ApiKeyMiddleware::new(KEY))
                .app_data(handlers::json_config())
                .app_data(web::Data::new(service($outbox.clone())))
                .configure(handlers::appointment_config),
        )
        .await
    };
}

fn post(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {KEY}")))
        .set_json(body)
}

#[actix_web::test]
async fn web_request_reaches_patient_and_front_desk() {
    let outbox = Arc::new(Outbox::default());
    let app = app!(outbox);

    let body = json!({
        "patientName": "Asha",
        "patientPhone": PATIENT,
        "doctorName": "Dr. Mehta",
        "date": "2025-09-14"
    });
    let resp = test::call_service(&app, post("/web-request", body).to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true, "message": "Inquiry processed" }));
    assert_eq!(outbox.recipients(), vec![PATIENT.to_string(), DESK.to_string()]);
}

#[actix_web::test]
async fn web_request_with_bad_number_does_not_alert_staff() {
    let outbox = Arc::new(Outbox {
        unreachable: HashSet::from([PATIENT.to_string()]),
        ..Outbox::default()
    });
    let app = app!(outbox);

    let body = json!({ "patientName": "Asha", "patientPhone": PATIENT });
    let resp = test::call_service(&app, post("/web-request", body).to_request()).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid Number or WhatsApp Error");
    assert!(outbox.recipients().is_empty());
}

#[actix_web::test]
async fn confirm_appointment_notifies_doctor_when_given() {
    let outbox = Arc::new(Outbox::default());
    let app = app!(outbox);

    let body = json!({
        "patientName": "Asha",
        "patientPhone": PATIENT,
        "doctorName": "Dr. Mehta",
        "doctorPhone": DOCTOR,
        "date": "2025-09-14",
        "time": "10:30"
    });
    let resp = test::call_service(&app, post("/confirm-appointment", body).to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Confirmation sent to all");
    assert_eq!(outbox.recipients(), vec![PATIENT.to_string(), DOCTOR.to_string()]);
}

#[actix_web::test]
async fn confirm_appointment_delivery_failure_is_server_error() {
    let outbox = Arc::new(Outbox {
        unreachable: HashSet::from([PATIENT.to_string()]),
        ..Outbox::default()
    });
    let app = app!(outbox);

    let body = json!({ "patientPhone": PATIENT, "doctorPhone": DOCTOR });
    let resp = test::call_service(&app, post("/confirm-appointment", body).to_request()).await;
    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "WhatsApp Send Failed");
    assert!(outbox.recipients().is_empty());
}

#[actix_web::test]
async fn walk_in_alerts_doctor() {
    let outbox = Arc::new(Outbox::default());
    let app = app!(outbox);

    let body = json!({
        "doctorName": "Dr. Mehta",
        "patientName": "Ravi",
        "doctorPhone": DOCTOR,
        "date": "2025-09-14",
        "time": "11:00",
        "reason": "Fever"
    });
    let resp = test::call_service(&app, post("/walk-in", body).to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true }));
    assert_eq!(outbox.recipients(), vec![DOCTOR.to_string()]);
}

#[actix_web::test]
async fn walk_in_without_doctor_phone_is_bad_request() {
    let outbox = Arc::new(Outbox::default());
    let app = app!(outbox);

    let resp = test::call_service(&app, post("/walk-in", json!({ "patientName": "Ravi" })).to_request()).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Doctor phone required");
}

#[actix_web::test]
async fn appointment_routes_require_api_key() {
    let outbox = Arc::new(Outbox::default());
    let app = app!(outbox);

    let req = test::TestRequest::post()
        .uri("/walk-in")
        .set_json(json!({ "doctorPhone": DOCTOR }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    assert!(outbox.recipients().is_empty());
}
