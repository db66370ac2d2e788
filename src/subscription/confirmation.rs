use std::sync::Arc;

use crate::crypto;
use crate::error::{Error, Result};
use crate::model::Subscription;
use crate::repo::{PendingSubscriptionRepository, SubscriptionRepository};

/// Promotes pending subscriptions once their link is followed
pub struct SubscriptionConfirmationService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    pending: Arc<dyn PendingSubscriptionRepository>,
}

impl SubscriptionConfirmationService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        pending: Arc<dyn PendingSubscriptionRepository>,
    ) -> Self {
        Self {
            subscriptions,
            pending,
        }
    }

    #[tracing::instrument(name = "Confirm subscription", skip(self))]
    pub async fn confirm(&self, confirmation_id: &str) -> Result<Subscription> {
        let pending = self
            .pending
            .find_by_confirmation_id(confirmation_id)
            .await?
            .ok_or(Error::InvalidConfirmationId)?;

        let subscription = pending.clone().confirm(crypto::generate_id());
        self.subscriptions.save(&subscription).await?;
        self.pending.delete(&pending).await?;

        tracing::info!(
            vrm = %subscription.vrm,
            contact_type = %subscription.contact.contact_type,
            "Subscription confirmed"
        );
        Ok(subscription)
    }
}
