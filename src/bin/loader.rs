use std::sync::Arc;

use anyhow::Context;

use chrono::Utc;

use motr::loader::{parse_request_date, SubscriptionLoader};
use motr::queue::SqsSubscriptionQueue;
use motr::repo::DynamoSubscriptionRepo;
use motr::settings::Settings;
use motr::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    telemetry::init("motr-loader", settings.log_filter())?;

    let request_date = match std::env::args().nth(1) {
        Some(arg) => parse_request_date(&arg)?,
        None => Utc::now().date_naive(),
    };

    let sdk_config = settings.aws.sdk_config().await;
    let subscriptions = Arc::new(DynamoSubscriptionRepo::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        &settings.database.subscription_table,
    ));
    let queue = Arc::new(SqsSubscriptionQueue::new(
        aws_sdk_sqs::Client::new(&sdk_config),
        &settings.queue,
    ));

    let report = SubscriptionLoader::new(subscriptions, queue)
        .run(request_date)
        .await
        .context("Subscription load failed")?;

    tracing::info!(%request_date, ?report, "Loader finished");
    Ok(())
}
