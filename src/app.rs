use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use anyhow::Context;

use secrecy::Secret;

use tracing_actix_web::TracingLogger;

use crate::client::{NotifyApiKey, NotifyClient, VehicleDetailsClient};
use crate::controller::{self, sms_receiver::CallbackToken};
use crate::crypto::SigningKey;
use crate::notify::NotifyService;
use crate::repo::{
    CancelledSubscriptionRepository, PendingSubscriptionRepository, SubscriptionRepository,
};
use crate::settings::Settings;
use crate::sms_receiver::SmsMessageProcessor;
use crate::subscription::{
    PendingSubscriptionService, SmsConfirmationService, SubscriptionConfirmationService,
    UnsubscribeService,
};

/// Services shared by the web handlers
pub struct AppState {
    pub vehicles: Arc<VehicleDetailsClient>,
    pub pending_subscriptions: PendingSubscriptionService,
    pub confirmations: SubscriptionConfirmationService,
    pub sms_confirmations: SmsConfirmationService,
    pub unsubscribe: UnsubscribeService,
}

impl AppState {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        pending: Arc<dyn PendingSubscriptionRepository>,
        cancelled: Arc<dyn CancelledSubscriptionRepository>,
        vehicles: Arc<VehicleDetailsClient>,
        notify: Arc<NotifyService>,
    ) -> Self {
        Self {
            pending_subscriptions: PendingSubscriptionService::new(
                subscriptions.clone(),
                pending.clone(),
                vehicles.clone(),
                notify.clone(),
            ),
            confirmations: SubscriptionConfirmationService::new(subscriptions.clone(), pending.clone()),
            sms_confirmations: SmsConfirmationService::new(pending, notify),
            unsubscribe: UnsubscribeService::new(subscriptions, cancelled),
            vehicles,
        }
    }
}

/// Notify client and templates, as configured
pub fn notify_service(settings: &Settings) -> anyhow::Result<Arc<NotifyService>> {
    let api_key = NotifyApiKey::parse(settings.notify.api_key())?;
    let client = NotifyClient::new(
        settings.notify.api_base_url.clone(),
        api_key,
        settings.notify.api_timeout(),
    )?;

    Ok(Arc::new(NotifyService::new(
        client,
        settings.notify.templates.clone(),
        settings.app.base_url.clone(),
    )))
}

pub fn vehicle_client(settings: &Settings) -> anyhow::Result<Arc<VehicleDetailsClient>> {
    let client = VehicleDetailsClient::new(
        settings.vehicle_api.api_base_url.clone(),
        settings.vehicle_api.api_key().clone(),
        settings.vehicle_api.api_timeout(),
    )
    .context("Failed to create vehicle details client")?;

    Ok(Arc::new(client))
}

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("I am alive")
}

/// Run the subscription web app on a specified TCP listener
pub fn run_webapp(
    listener: TcpListener,
    state: AppState,
    signing_key: SigningKey,
) -> anyhow::Result<Server> {
    // Wrap application data
    let state = web::Data::new(state);
    let signing_key = web::Data::new(signing_key);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .app_data(signing_key.clone())
            .service(health_check)
            .configure(controller::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Run the inbound SMS webhook on a specified TCP listener
pub fn run_sms_receiver(
    listener: TcpListener,
    processor: SmsMessageProcessor,
    bearer_token: Secret<String>,
) -> anyhow::Result<Server> {
    let processor = web::Data::new(processor);
    let token = web::Data::new(CallbackToken(bearer_token));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(processor.clone())
            .app_data(token.clone())
            .service(health_check)
            .configure(controller::sms_receiver::configure)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
