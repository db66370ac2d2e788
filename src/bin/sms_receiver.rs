use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;

use motr::app;
use motr::repo::{DynamoCancelledSubscriptionRepo, DynamoSubscriptionRepo};
use motr::settings::Settings;
use motr::sms_receiver::SmsMessageProcessor;
use motr::subscription::UnsubscribeService;
use motr::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    telemetry::init("motr-sms-receiver", settings.log_filter())?;

    let sdk_config = settings.aws.sdk_config().await;
    let dynamo = aws_sdk_dynamodb::Client::new(&sdk_config);

    let subscriptions = Arc::new(DynamoSubscriptionRepo::new(
        dynamo.clone(),
        &settings.database.subscription_table,
    ));
    let cancelled = Arc::new(DynamoCancelledSubscriptionRepo::new(
        dynamo,
        &settings.database.cancelled_subscription_table,
    ));
    let unsubscribe = Arc::new(UnsubscribeService::new(subscriptions.clone(), cancelled.clone()));
    let processor = SmsMessageProcessor::new(
        subscriptions,
        cancelled,
        unsubscribe,
        app::notify_service(&settings)?,
    );

    let listener = TcpListener::bind(settings.sms_receiver.addr())?;
    tracing::info!(addr = ?listener.local_addr()?, "Sms receiver listening");

    app::run_sms_receiver(listener, processor, settings.sms_receiver.bearer_token().clone())?
        .await
        .context("Failed to run sms receiver")
}
