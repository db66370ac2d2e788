use std::sync::Arc;

use anyhow::Context;

use motr::app;
use motr::notifier::{QueueUnloader, ReminderProcessor};
use motr::queue::SqsSubscriptionQueue;
use motr::repo::DynamoSubscriptionRepo;
use motr::settings::Settings;
use motr::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    telemetry::init("motr-notifier", settings.log_filter())?;

    let sdk_config = settings.aws.sdk_config().await;
    let subscriptions = Arc::new(DynamoSubscriptionRepo::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        &settings.database.subscription_table,
    ));
    let queue = Arc::new(SqsSubscriptionQueue::new(
        aws_sdk_sqs::Client::new(&sdk_config),
        &settings.queue,
    ));

    let processor = Arc::new(ReminderProcessor::new(
        subscriptions,
        app::vehicle_client(&settings)?,
        app::notify_service(&settings)?,
    ));

    let summary = QueueUnloader::new(queue, processor, settings.notifier.clone())
        .run()
        .await
        .context("Queue unload failed")?;

    tracing::info!(?summary, "Notifier finished");
    Ok(())
}
