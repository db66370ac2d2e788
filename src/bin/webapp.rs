use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use motr::app::{self, AppState};
use motr::crypto::SigningKey;
use motr::repo::{DynamoCancelledSubscriptionRepo, DynamoPendingSubscriptionRepo, DynamoSubscriptionRepo};
use motr::settings::Settings;
use motr::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    telemetry::init("motr-webapp", settings.log_filter())?;

    let sdk_config = settings.aws.sdk_config().await;
    let dynamo = aws_sdk_dynamodb::Client::new(&sdk_config);
    let tables = &settings.database;

    let state = AppState::new(
        Arc::new(DynamoSubscriptionRepo::new(dynamo.clone(), &tables.subscription_table)),
        Arc::new(DynamoPendingSubscriptionRepo::new(
            dynamo.clone(),
            &tables.pending_subscription_table,
        )),
        Arc::new(DynamoCancelledSubscriptionRepo::new(
            dynamo,
            &tables.cancelled_subscription_table,
        )),
        app::vehicle_client(&settings)?,
        app::notify_service(&settings)?,
    );
    let signing_key = SigningKey::new(settings.app.secret_key())?;

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!(addr = ?listener.local_addr()?, "Web app listening");

    app::run_webapp(listener, state, signing_key)?
        .await
        .context("Failed to run web app")
}
