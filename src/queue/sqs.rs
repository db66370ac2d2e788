use async_trait::async_trait;

use aws_sdk_sqs::types::MessageAttributeValue;
use aws_sdk_sqs::Client;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::SubscriptionQueueItem;
use crate::settings::QueueSettings;

use super::{QueueMessage, ReceivedBatch, SubscriptionQueue};

const CORRELATION_ID_ATTRIBUTE: &str = "correlation-id";
const MAX_MESSAGES_PER_RECEIVE: i32 = 10;

/// SQS-backed reminder queue
#[derive(Debug, Clone)]
pub struct SqsSubscriptionQueue {
    client: Client,
    queue_url: String,
    wait_time_seconds: i32,
    visibility_timeout_seconds: i32,
}

impl SqsSubscriptionQueue {
    pub fn new(client: Client, settings: &QueueSettings) -> Self {
        Self {
            client,
            queue_url: settings.url.clone(),
            wait_time_seconds: settings.wait_time_seconds,
            visibility_timeout_seconds: settings.visibility_timeout_seconds,
        }
    }
}

#[async_trait]
impl SubscriptionQueue for SqsSubscriptionQueue {
    #[tracing::instrument(name = "Enqueue subscription", skip(self, item), fields(id = %item.id))]
    async fn enqueue(&self, item: &SubscriptionQueueItem) -> Result<()> {
        let body = serde_json::to_string(item)?;
        let correlation_id = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(Uuid::new_v4().to_string())
            .build()
            .map_err(Error::queue)?;

        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .message_attributes(CORRELATION_ID_ATTRIBUTE, correlation_id)
            .send()
            .await
            .map_err(Error::queue)?;

        Ok(())
    }

    #[tracing::instrument(name = "Receive queue messages", skip(self))]
    async fn receive(&self) -> Result<ReceivedBatch> {
        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(MAX_MESSAGES_PER_RECEIVE)
            .wait_time_seconds(self.wait_time_seconds)
            .visibility_timeout(self.visibility_timeout_seconds)
            .message_attribute_names(CORRELATION_ID_ATTRIBUTE)
            .send()
            .await
            .map_err(Error::queue)?;

        let received = output.messages.unwrap_or_default();
        let count = received.len();

        let messages = received
            .into_iter()
            .filter_map(|message| {
                let receipt_handle = message.receipt_handle?;
                let correlation_id = message
                    .message_attributes
                    .as_ref()
                    .and_then(|attributes| attributes.get(CORRELATION_ID_ATTRIBUTE))
                    .and_then(|value| value.string_value.clone());

                let body = message.body.unwrap_or_default();
                match serde_json::from_str(&body) {
                    Ok(item) => Some(QueueMessage {
                        receipt_handle,
                        correlation_id,
                        item,
                    }),
                    Err(e) => {
                        // Left on the queue so redrive can move it aside
                        tracing::error!(error = %e, message_id = ?message.message_id, "Unreadable queue message");
                        None
                    }
                }
            })
            .collect();

        Ok(ReceivedBatch {
            received: count,
            messages,
        })
    }

    #[tracing::instrument(name = "Remove queue message", skip(self, receipt_handle))]
    async fn remove(&self, receipt_handle: &str) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(Error::queue)?;

        Ok(())
    }
}
