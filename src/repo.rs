use async_trait::async_trait;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{CancelledSubscription, PendingSubscription, Subscription};

mod cancelled_subscriptions;
mod item;
pub mod memory;
mod pending_subscriptions;
mod subscriptions;

pub use cancelled_subscriptions::*;
pub use pending_subscriptions::*;
pub use subscriptions::*;

/// Confirmed subscriptions, unique per (vrm, contact)
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_vrm_and_contact(&self, vrm: &str, contact: &str) -> Result<Option<Subscription>>;
    /// Look up by unsubscribe id
    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>>;
    /// Every subscription whose due date is exactly `date`
    async fn find_due_on(&self, date: NaiveDate) -> Result<Vec<Subscription>>;
    /// Insert or replace the record for the subscription's (vrm, contact)
    async fn save(&self, subscription: &Subscription) -> Result<()>;
    /// Delete the record if it still carries the subscription's id
    async fn delete(&self, subscription: &Subscription) -> Result<()>;
}

#[async_trait]
pub trait PendingSubscriptionRepository: Send + Sync {
    async fn find_by_confirmation_id(&self, id: &str) -> Result<Option<PendingSubscription>>;
    async fn find_by_vrm_and_contact(
        &self,
        vrm: &str,
        contact: &str,
    ) -> Result<Option<PendingSubscription>>;
    async fn save(&self, pending: &PendingSubscription) -> Result<()>;
    /// Delete the record if it still carries the pending subscription's confirmation id
    async fn delete(&self, pending: &PendingSubscription) -> Result<()>;
}

#[async_trait]
pub trait CancelledSubscriptionRepository: Send + Sync {
    async fn save(&self, cancelled: &CancelledSubscription) -> Result<()>;
    async fn find_by_vrm_and_contact(
        &self,
        vrm: &str,
        contact: &str,
    ) -> Result<Option<CancelledSubscription>>;
}
