//! In-process queue, used by tests and local runs without SQS

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use uuid::Uuid;

use crate::error::Result;
use crate::model::SubscriptionQueueItem;

use super::{QueueMessage, ReceivedBatch, SubscriptionQueue};

const BATCH_SIZE: usize = 10;

/// Message bodies, stored serialized as they would be on SQS
#[derive(Debug, Default)]
struct State {
    waiting: VecDeque<String>,
    in_flight: HashMap<String, String>,
}

fn readable<'a>(bodies: impl Iterator<Item = &'a String>) -> Vec<SubscriptionQueueItem> {
    bodies
        .filter_map(|body| serde_json::from_str(body).ok())
        .collect()
}

/// Received messages stay in flight until removed. Nothing is redelivered within a run.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionQueue {
    state: Mutex<State>,
}

impl InMemorySubscriptionQueue {
    pub fn waiting(&self) -> Vec<SubscriptionQueueItem> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        readable(state.waiting.iter())
    }

    pub fn in_flight(&self) -> Vec<SubscriptionQueueItem> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        readable(state.in_flight.values())
    }

    /// Queue a body as-is, whether or not it is a valid item
    pub fn enqueue_raw(&self, body: impl Into<String>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.waiting.push_back(body.into());
    }
}

#[async_trait]
impl SubscriptionQueue for InMemorySubscriptionQueue {
    async fn enqueue(&self, item: &SubscriptionQueueItem) -> Result<()> {
        let body = serde_json::to_string(item)?;
        self.enqueue_raw(body);
        Ok(())
    }

    async fn receive(&self) -> Result<ReceivedBatch> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let count = state.waiting.len().min(BATCH_SIZE);

        let bodies: Vec<_> = state.waiting.drain(..count).collect();
        let mut messages = Vec::with_capacity(count);
        for body in bodies {
            let receipt_handle = Uuid::new_v4().to_string();
            state.in_flight.insert(receipt_handle.clone(), body.clone());

            match serde_json::from_str(&body) {
                Ok(item) => messages.push(QueueMessage {
                    receipt_handle,
                    correlation_id: None,
                    item,
                }),
                Err(e) => tracing::error!(error = %e, "Unreadable queue message"),
            }
        }

        Ok(ReceivedBatch {
            received: count,
            messages,
        })
    }

    async fn remove(&self, receipt_handle: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight.remove(receipt_handle);
        Ok(())
    }
}
