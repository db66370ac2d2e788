use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use tracing::Instrument;

use crate::error::Result;
use crate::queue::{QueueMessage, SubscriptionQueue};
use crate::settings::NotifierSettings;

use super::{NotifierReport, NotifierSummary, ReminderProcessor};

/// Drains the reminder queue through a bounded pool of workers
pub struct QueueUnloader {
    queue: Arc<dyn SubscriptionQueue>,
    processor: Arc<ReminderProcessor>,
    settings: NotifierSettings,
}

impl QueueUnloader {
    pub fn new(
        queue: Arc<dyn SubscriptionQueue>,
        processor: Arc<ReminderProcessor>,
        settings: NotifierSettings,
    ) -> Self {
        Self {
            queue,
            processor,
            settings,
        }
    }

    #[tracing::instrument(name = "Unload reminder queue", skip(self))]
    pub async fn run(&self) -> Result<NotifierSummary> {
        let deadline = Instant::now() + self.settings.run_budget();
        let threshold = self.settings.remaining_time_threshold();

        let report = Arc::new(NotifierReport::start());
        let workers = Arc::new(Semaphore::new(self.settings.worker_count.max(1)));
        let mut tasks = JoinSet::new();

        'pull: loop {
            let messages = match self.queue.receive().await {
                Ok(batch) if batch.is_drained() => break,
                Ok(batch) => batch.messages,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to receive from queue");
                    break;
                }
            };

            for message in messages {
                if deadline.saturating_duration_since(Instant::now()) < threshold {
                    tracing::warn!(
                        remaining_ms = deadline.saturating_duration_since(Instant::now()).as_millis() as u64,
                        "Unloading timed out"
                    );
                    break 'pull;
                }

                let permit = workers
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| anyhow::anyhow!("Worker pool closed: {}", e))?;

                let span = tracing::info_span!(
                    "Reminder worker",
                    correlation_id = message.correlation_id.as_deref().unwrap_or("")
                );
                let task = process_message(
                    message,
                    self.queue.clone(),
                    self.processor.clone(),
                    report.clone(),
                );
                tasks.spawn(
                    async move {
                        let _permit = permit;
                        task.await
                    }
                    .instrument(span),
                );
            }
        }

        let in_flight = async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "Reminder worker panicked");
                    report.record_failure();
                }
            }
        };
        if tokio::time::timeout(self.settings.post_processing_delay(), in_flight)
            .await
            .is_err()
        {
            tracing::warn!(
                abandoned = tasks.len(),
                "Post processing delay elapsed, abandoning in-flight reminders"
            );
            tasks.abort_all();
        }

        let summary = report.summary();
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            duration_ms = summary.duration.as_millis() as u64,
            "Reminders processed"
        );
        Ok(summary)
    }
}

async fn process_message(
    message: QueueMessage,
    queue: Arc<dyn SubscriptionQueue>,
    processor: Arc<ReminderProcessor>,
    report: Arc<NotifierReport>,
) {
    if let Err(e) = processor.process(&message.item).await {
        // Left on the queue, redelivered once the visibility timeout passes
        tracing::error!(error = %e, id = %message.item.id, "Failed to process reminder");
        report.record_failure();
        return;
    }

    match queue.remove(&message.receipt_handle).await {
        Ok(()) => report.record_success(),
        Err(e) => {
            tracing::error!(error = %e, id = %message.item.id, "Failed to remove reminder from queue");
            report.record_failure();
        }
    }
}
