//! Fixtures shared by unit tests across modules

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use secrecy::Secret;

use url::Url;

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::{NotifyApiKey, NotifyClient, VehicleDetailsClient};
use crate::domain::{ContactDetail, MotIdentification, VehicleType};
use crate::model::Subscription;
use crate::notify::NotifyService;
use crate::settings::{ReminderTemplates, TemplateSettings};

pub const BASE_URL: &str = "https://motr.example.gov.uk";
pub const NOTIFY_API_KEY: &str =
    "test_key-26785a09-ab16-4eb0-8407-a37497a57506-3d844edf-8d35-48ac-975b-e847b4f122b0";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reminder_templates(channel: &str) -> ReminderTemplates {
    ReminderTemplates {
        one_month: format!("{}-one-month", channel),
        two_weeks: format!("{}-two-weeks", channel),
        one_day_after: format!("{}-one-day-after", channel),
        one_month_hgv_psv: format!("{}-one-month-hgv-psv", channel),
        two_months_hgv_psv: format!("{}-two-months-hgv-psv", channel),
    }
}

pub fn templates() -> TemplateSettings {
    TemplateSettings {
        email_confirmation: "email-confirmation".into(),
        sms_confirmation_code: "sms-confirmation-code".into(),
        sms_unsubscription_confirmation: "sms-unsubscription-confirmation".into(),
        email_reminders: reminder_templates("email"),
        sms_reminders: reminder_templates("sms"),
    }
}

pub fn notify_service(server: &MockServer) -> Arc<NotifyService> {
    let api_key = NotifyApiKey::parse(&Secret::new(NOTIFY_API_KEY.into())).unwrap();
    let client = NotifyClient::new(
        Url::parse(&server.uri()).unwrap(),
        api_key,
        Duration::from_secs(2),
    )
    .unwrap();

    Arc::new(NotifyService::new(
        client,
        templates(),
        Url::parse(BASE_URL).unwrap(),
    ))
}

pub fn vehicle_client(server: &MockServer) -> Arc<VehicleDetailsClient> {
    let client = VehicleDetailsClient::new(
        Url::parse(&server.uri()).unwrap(),
        Secret::new("test-api-key".into()),
        Duration::from_secs(2),
    )
    .unwrap();

    Arc::new(client)
}

pub fn vehicle_json(vrm: &str, expiry: NaiveDate) -> serde_json::Value {
    serde_json::json!({
        "make": "test-make",
        "model": "test-model",
        "registration": vrm,
        "motTestExpiryDate": expiry.to_string(),
        "motTestNumber": "123456",
        "vehicleType": "MOT"
    })
}

/// Answer every vehicle lookup with the same record
pub async fn mount_vehicle(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/vehicles/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_notify(server: &MockServer, channel: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/v2/notifications/{}", channel)))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;
}

/// Bodies of every request Notify received
pub async fn notify_bodies(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|req| serde_json::from_slice(&req.body).unwrap())
        .collect()
}

pub fn subscription(vrm: &str, contact: ContactDetail, due: NaiveDate) -> Subscription {
    Subscription {
        id: format!("{}-unsubscribe-id", vrm),
        vrm: vrm.into(),
        contact,
        mot_identification: MotIdentification::MotTestNumber("123456".into()),
        mot_due_date: due,
        vehicle_type: VehicleType::Mot,
        created_at: Utc::now(),
        updated_at: None,
    }
}
