use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use reqwest::{redirect, Client, Method, Response};

use secrecy::Secret;

use serde::Serialize;

use url::Url;

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use motr::app::{self, AppState};
use motr::client::{NotifyApiKey, NotifyClient, VehicleDetailsClient};
use motr::crypto::SigningKey;
use motr::domain::{ContactDetail, MotIdentification, VehicleType};
use motr::model::Subscription;
use motr::notify::NotifyService;
use motr::repo::memory::{
    InMemoryCancelledSubscriptionRepo, InMemoryPendingSubscriptionRepo, InMemorySubscriptionRepo,
};
use motr::settings::{ReminderTemplates, TemplateSettings};
use motr::sms_receiver::SmsMessageProcessor;
use motr::subscription::UnsubscribeService;

pub const BASE_URL: &str = "https://motr.example.gov.uk";
pub const SMS_BEARER_TOKEN: &str = "test-bearer-token";
const NOTIFY_API_KEY: &str =
    "test_key-26785a09-ab16-4eb0-8407-a37497a57506-3d844edf-8d35-48ac-975b-e847b4f122b0";

#[derive(Debug, Default, Serialize)]
pub struct VrmForm {
    #[serde(rename = "regNumber")]
    pub reg_number: String,
    pub honey: String,
}

pub struct TestApp {
    addr: String,
    sms_receiver_addr: String,

    pub client: Client,
    pub notify_server: MockServer,
    pub vehicle_server: MockServer,

    pub subscriptions: Arc<InMemorySubscriptionRepo>,
    pub pending: Arc<InMemoryPendingSubscriptionRepo>,
    pub cancelled: Arc<InMemoryCancelledSubscriptionRepo>,
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

fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
    let port = listener.local_addr().unwrap().port();

    (listener, format!("http://127.0.0.1:{}", port))
}

impl TestApp {
    pub async fn spawn() -> Self {
        use rand::{distributions::Alphanumeric, Rng};

        let (listener, addr) = bind();
        let (sms_listener, sms_receiver_addr) = bind();

        let signing_key = {
            let rand_key: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(32)
                .map(char::from)
                .collect();

            SigningKey::new(&Secret::new(rand_key)).expect("Failed to create signing key")
        };

        let notify_server = MockServer::start().await;
        let vehicle_server = MockServer::start().await;

        let notify = {
            let api_key = NotifyApiKey::parse(&Secret::new(NOTIFY_API_KEY.into()))
                .expect("Failed to parse notify api key");
            let client = NotifyClient::new(
                Url::parse(&notify_server.uri()).expect("Failed to parse mock server uri"),
                api_key,
                Duration::from_secs(2),
            )
            .expect("Failed to create notify client");
            let templates = TemplateSettings {
                email_confirmation: "email-confirmation".into(),
                sms_confirmation_code: "sms-confirmation-code".into(),
                sms_unsubscription_confirmation: "sms-unsubscription-confirmation".into(),
                email_reminders: reminder_templates("email"),
                sms_reminders: reminder_templates("sms"),
            };

            Arc::new(NotifyService::new(client, templates, Url::parse(BASE_URL).unwrap()))
        };

        let vehicles = Arc::new(
            VehicleDetailsClient::new(
                Url::parse(&vehicle_server.uri()).expect("Failed to parse mock server uri"),
                Secret::new("test-api-key".into()),
                Duration::from_secs(2),
            )
            .expect("Failed to create vehicle client"),
        );

        let subscriptions = Arc::new(InMemorySubscriptionRepo::default());
        let pending = Arc::new(InMemoryPendingSubscriptionRepo::default());
        let cancelled = Arc::new(InMemoryCancelledSubscriptionRepo::default());

        let state = AppState::new(
            subscriptions.clone(),
            pending.clone(),
            cancelled.clone(),
            vehicles,
            notify.clone(),
        );
        let server = app::run_webapp(listener, state, signing_key)
            .expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let processor = SmsMessageProcessor::new(
            subscriptions.clone(),
            cancelled.clone(),
            Arc::new(UnsubscribeService::new(subscriptions.clone(), cancelled.clone())),
            notify,
        );
        let sms_server =
            app::run_sms_receiver(sms_listener, processor, Secret::new(SMS_BEARER_TOKEN.into()))
                .expect("Failed to spawn sms receiver instance");
        let _ = tokio::spawn(sms_server);

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to build http client");

        Self {
            addr,
            sms_receiver_addr,
            client,
            notify_server,
            vehicle_server,
            subscriptions,
            pending,
            cancelled,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub async fn get(&self, url: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, url).send().await
    }

    pub async fn post_form<T: Serialize>(&self, url: &str, form: &T) -> reqwest::Result<Response> {
        self.request(Method::POST, url).form(form).send().await
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.get("health_check").await
    }

    pub async fn submit_vrm(&self, vrm: &str) -> reqwest::Result<Response> {
        let form = VrmForm {
            reg_number: vrm.into(),
            ..Default::default()
        };
        self.post_form("vrm", &form).await
    }

    pub async fn post(&self, url: &str) -> reqwest::Result<Response> {
        self.request(Method::POST, url).send().await
    }

    pub async fn submit_review(&self) -> reqwest::Result<Response> {
        self.post("review").await
    }

    pub async fn sms_receiver(&self, bearer_token: Option<&str>, body: &serde_json::Value) -> reqwest::Result<Response> {
        let req = self
            .client
            .post(format!("{}/sms-receiver", &self.sms_receiver_addr))
            .json(body);
        let req = match bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        req.send().await
    }

    /// Answer every registration lookup with the same vehicle
    pub async fn mount_vehicle(&self, vrm: &str, expiry: NaiveDate) {
        Mock::given(method("GET"))
            .and(path_regex(r"^/vehicles/registration/.+"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vehicle_json(vrm, expiry)))
            .mount(&self.vehicle_server)
            .await;
    }

    pub async fn mount_notify(&self) {
        for channel in ["email", "sms"] {
            Mock::given(method("POST"))
                .and(path(format!("/v2/notifications/{}", channel)))
                .respond_with(ResponseTemplate::new(201))
                .mount(&self.notify_server)
                .await;
        }
    }

    /// Bodies of every request Notify received, in order
    pub async fn notify_bodies(&self) -> Vec<serde_json::Value> {
        self.notify_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|req| serde_json::from_slice(&req.body).expect("Notify request body is not json"))
            .collect()
    }

    /// Walk the form from the registration page up to the review page
    pub async fn fill_in_email_journey(&self, vrm: &str, email: &str) {
        let res = self.submit_vrm(vrm).await.expect("Failed to submit vrm");
        assert_redirect_to(&res, "/channel-selection");

        let res = self
            .post_form("channel-selection", &[("channel", "email")])
            .await
            .expect("Failed to choose channel");
        assert_redirect_to(&res, "/email");

        let res = self
            .post_form("email", &[("emailAddress", email)])
            .await
            .expect("Failed to submit email");
        assert_redirect_to(&res, "/review");
    }

    pub async fn fill_in_sms_journey(&self, vrm: &str, phone_number: &str) {
        let res = self.submit_vrm(vrm).await.expect("Failed to submit vrm");
        assert_redirect_to(&res, "/channel-selection");

        let res = self
            .post_form("channel-selection", &[("channel", "text")])
            .await
            .expect("Failed to choose channel");
        assert_redirect_to(&res, "/phone-number");

        let res = self
            .post_form("phone-number", &[("phoneNumber", phone_number)])
            .await
            .expect("Failed to submit phone number");
        assert_redirect_to(&res, "/review");
    }
}

pub fn future_expiry() -> NaiveDate {
    Utc::now().date_naive() + chrono::Duration::days(60)
}

pub fn vehicle_json(vrm: &str, expiry: NaiveDate) -> serde_json::Value {
    serde_json::json!({
        "make": "test-make",
        "model": "test-model",
        "primaryColour": "Blue",
        "registration": vrm,
        "motTestExpiryDate": expiry.to_string(),
        "motTestNumber": "123456",
        "vehicleType": "MOT"
    })
}

pub fn subscription(vrm: &str, contact: ContactDetail, id: &str) -> Subscription {
    Subscription {
        id: id.into(),
        vrm: vrm.into(),
        contact,
        mot_identification: MotIdentification::MotTestNumber("123456".into()),
        mot_due_date: future_expiry(),
        vehicle_type: VehicleType::Mot,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn assert_redirect_to(res: &Response, location: &str) {
    assert_eq!(res.status().as_u16(), 303, "expected a redirect to {}", location);
    assert_eq!(
        res.headers()
            .get("Location")
            .expect("Missing location header")
            .to_str()
            .unwrap(),
        location
    );
}
