use async_trait::async_trait;

use crate::error::Result;
use crate::model::SubscriptionQueueItem;

pub mod memory;
mod sqs;

pub use sqs::*;

/// A received queue message, removed from the queue with its receipt handle
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub receipt_handle: String,
    pub correlation_id: Option<String>,
    pub item: SubscriptionQueueItem,
}

/// One receive call. `received` counts every message the queue handed out,
/// including unreadable ones that were dropped from `messages`.
#[derive(Debug, Clone, Default)]
pub struct ReceivedBatch {
    pub received: usize,
    pub messages: Vec<QueueMessage>,
}

impl ReceivedBatch {
    /// Only a receive that returned nothing at all means the queue is drained
    pub fn is_drained(&self) -> bool {
        self.received == 0
    }
}

/// Queue of subscriptions due for a reminder
#[async_trait]
pub trait SubscriptionQueue: Send + Sync {
    async fn enqueue(&self, item: &SubscriptionQueueItem) -> Result<()>;
    /// Receive the next batch of messages
    async fn receive(&self) -> Result<ReceivedBatch>;
    async fn remove(&self, receipt_handle: &str) -> Result<()>;
}
