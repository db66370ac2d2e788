use std::sync::Arc;

use chrono::NaiveDate;

use crate::client::VehicleDetailsClient;
use crate::domain::Vrm;
use crate::error::{Error, Result};
use crate::model::SubscriptionQueueItem;
use crate::notify::{NotifyService, ReminderTier};
use crate::repo::SubscriptionRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    Sent(ReminderTier),
    /// No reminder is due today for the vehicle's current expiry date
    NothingDue,
    /// The subscription went away between loading and sending
    Unsubscribed,
}

/// Handles one queued subscription: checks the vehicle record, then sends the due reminder
pub struct ReminderProcessor {
    subscriptions: Arc<dyn SubscriptionRepository>,
    vehicles: Arc<VehicleDetailsClient>,
    notify: Arc<NotifyService>,
}

impl ReminderProcessor {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        vehicles: Arc<VehicleDetailsClient>,
        notify: Arc<NotifyService>,
    ) -> Self {
        Self {
            subscriptions,
            vehicles,
            notify,
        }
    }

    #[tracing::instrument(name = "Process queued subscription", skip(self, item), fields(id = %item.id))]
    pub async fn process(&self, item: &SubscriptionQueueItem) -> Result<ReminderOutcome> {
        let id = item
            .mot_identification()
            .ok_or_else(|| Error::VehicleNotFound(format!("{} has no MOT identification", item.vrm)))?;

        let vehicle = match self.vehicles.fetch_by_identification(&id).await {
            Ok(Some(vehicle)) => vehicle,
            Ok(None) => {
                tracing::warn!(vrm = %item.vrm, "Vehicle lookup found nothing");
                return Err(Error::VehicleNotFound(item.vrm.clone()));
            }
            Err(e) => {
                tracing::error!(error = %e, vrm = %item.vrm, "Vehicle lookup failed");
                return Err(e);
            }
        };
        let expiry_date = vehicle
            .mot_expiry_date
            .ok_or_else(|| Error::VehicleNotFound(format!("{} has no MOT expiry date", item.vrm)))?;

        let vrm = vehicle
            .registration
            .as_deref()
            .and_then(|registration| registration.parse::<Vrm>().ok())
            .map(String::from)
            .unwrap_or_else(|| item.vrm.clone());

        let mut item = item.clone();
        if expiry_date != item.mot_due_date || vrm != item.vrm {
            if !self.update_subscription(&item, expiry_date, &vrm).await? {
                return Ok(ReminderOutcome::Unsubscribed);
            }
            item.mot_due_date = expiry_date;
            item.vrm = vrm;
        }

        let tier = match ReminderTier::select(item.vehicle_type, item.loaded_on_date, expiry_date) {
            Some(tier) => tier,
            None => {
                tracing::info!(vrm = %item.vrm, %expiry_date, "No reminder due");
                return Ok(ReminderOutcome::NothingDue);
            }
        };

        if let Err(e) = self.notify.send_reminder(tier, &item, &vehicle, expiry_date).await {
            tracing::error!(error = %e, vrm = %item.vrm, tier = tier.name(), "Notification send failed");
            return Err(e);
        }

        tracing::info!(vrm = %item.vrm, tier = tier.name(), "Reminder sent");
        Ok(ReminderOutcome::Sent(tier))
    }

    /// Bring the stored subscription in line with the vehicle record. `false` if it no longer exists.
    async fn update_subscription(
        &self,
        item: &SubscriptionQueueItem,
        expiry_date: NaiveDate,
        vrm: &str,
    ) -> Result<bool> {
        let subscription = self
            .subscriptions
            .find_by_vrm_and_contact(&item.vrm, &item.contact.value)
            .await?
            .filter(|subscription| subscription.id == item.id);

        let mut subscription = match subscription {
            Some(subscription) => subscription,
            None => {
                tracing::info!(id = %item.id, "Subscription removed before its reminder was sent");
                return Ok(false);
            }
        };

        if subscription.vrm != vrm {
            // The vrm is part of the key, so the record moves
            self.subscriptions.delete(&subscription).await?;
            subscription.vrm = vrm.to_string();
        }
        subscription.mot_due_date = expiry_date;
        self.subscriptions.save(&subscription).await?;

        tracing::info!(id = %item.id, %expiry_date, vrm, "Subscription updated from vehicle record");
        Ok(true)
    }
}
