use std::sync::Arc;

use crate::error::Result;
use crate::model::{CancelledSubscription, Subscription, USER_CANCELLED};
use crate::repo::{CancelledSubscriptionRepository, SubscriptionRepository};

/// Archives and removes subscriptions
pub struct UnsubscribeService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    cancelled: Arc<dyn CancelledSubscriptionRepository>,
}

impl UnsubscribeService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        cancelled: Arc<dyn CancelledSubscriptionRepository>,
    ) -> Self {
        Self {
            subscriptions,
            cancelled,
        }
    }

    pub async fn find(&self, unsubscribe_id: &str) -> Result<Option<Subscription>> {
        self.subscriptions.find_by_id(unsubscribe_id).await
    }

    /// Unsubscribe by the id in an unsubscribe link. `None` when nothing matched.
    #[tracing::instrument(name = "Unsubscribe", skip(self))]
    pub async fn unsubscribe(&self, unsubscribe_id: &str) -> Result<Option<Subscription>> {
        match self.find(unsubscribe_id).await? {
            Some(subscription) => {
                self.cancel(&subscription).await?;
                Ok(Some(subscription))
            }
            None => Ok(None),
        }
    }

    /// Archive then delete, so a failure never loses the record
    pub async fn cancel(&self, subscription: &Subscription) -> Result<()> {
        let cancelled = CancelledSubscription::from_subscription(subscription, USER_CANCELLED);

        self.cancelled.save(&cancelled).await?;
        self.subscriptions.delete(subscription).await?;

        tracing::info!(
            vrm = %subscription.vrm,
            contact_type = %subscription.contact.contact_type,
            "Subscription cancelled"
        );
        Ok(())
    }
}
