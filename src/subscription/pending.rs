use std::sync::Arc;

use chrono::Utc;

use crate::client::VehicleDetailsClient;
use crate::crypto;
use crate::domain::ContactDetail;
use crate::error::{Error, Result};
use crate::model::{PendingSubscription, SmsConfirmation, Subscription};
use crate::notify::NotifyService;
use crate::repo::{PendingSubscriptionRepository, SubscriptionRepository};

use super::MAX_CODE_RESENDS;

/// What the subscriber should be shown after submitting the review page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingSubscriptionOutcome {
    /// A subscription already existed, and has been refreshed from the vehicle record
    AlreadySubscribed,
    /// A confirmation link has been emailed
    EmailConfirmationSent,
    /// A confirmation code has been texted
    SmsCodeSent { confirmation_id: String },
    /// No code was texted, the pending subscription has used up its resends
    SmsCodeLimited { confirmation_id: String },
}

pub struct PendingSubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    pending: Arc<dyn PendingSubscriptionRepository>,
    vehicles: Arc<VehicleDetailsClient>,
    notify: Arc<NotifyService>,
}

impl PendingSubscriptionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        pending: Arc<dyn PendingSubscriptionRepository>,
        vehicles: Arc<VehicleDetailsClient>,
        notify: Arc<NotifyService>,
    ) -> Self {
        Self {
            subscriptions,
            pending,
            vehicles,
            notify,
        }
    }

    /// Start (or restart) a subscription for `vrm` and `contact`
    #[tracing::instrument(name = "Create pending subscription", skip(self, contact), fields(contact_type = %contact.contact_type))]
    pub async fn create(&self, vrm: &str, contact: &ContactDetail) -> Result<PendingSubscriptionOutcome> {
        if let Some(subscription) = self
            .subscriptions
            .find_by_vrm_and_contact(vrm, &contact.value)
            .await?
        {
            self.refresh_subscription(subscription).await;
            return Ok(PendingSubscriptionOutcome::AlreadySubscribed);
        }

        // Session data is not trusted, the vehicle record is fetched again
        let vehicle = self
            .vehicles
            .fetch_by_vrm(vrm)
            .await?
            .ok_or_else(|| Error::VehicleNotFound(vrm.to_string()))?;

        let existing = self.pending.find_by_vrm_and_contact(vrm, &contact.value).await?;
        let confirmation_id = existing
            .as_ref()
            .map(|existing| existing.confirmation_id.clone())
            .unwrap_or_else(crypto::generate_id);

        let sms_confirmation = if contact.is_mobile() {
            match existing.and_then(|existing| existing.sms_confirmation) {
                // Texting a code again counts against the resend limit
                Some(previous) if previous.resends >= MAX_CODE_RESENDS => {
                    tracing::warn!(vrm, confirmation_id = %confirmation_id, "Sms confirmation resend limit reached");
                    return Ok(PendingSubscriptionOutcome::SmsCodeLimited { confirmation_id });
                }
                Some(previous) => Some(SmsConfirmation {
                    resends: previous.resends + 1,
                    ..SmsConfirmation::new(crypto::generate_confirmation_code())
                }),
                None => Some(SmsConfirmation::new(crypto::generate_confirmation_code())),
            }
        } else {
            None
        };

        let pending = PendingSubscription {
            confirmation_id: confirmation_id.clone(),
            vrm: vrm.to_string(),
            contact: contact.clone(),
            mot_identification: vehicle
                .mot_identification()
                .ok_or_else(|| Error::VehicleNotFound(format!("{} has no MOT identification", vrm)))?,
            mot_due_date: vehicle
                .mot_expiry_date
                .ok_or_else(|| Error::VehicleNotFound(format!("{} has no MOT due date", vrm)))?,
            vehicle_type: vehicle.vehicle_type,
            created_at: Utc::now(),
            sms_confirmation,
        };

        if let Err(e) = self.pending.save(&pending).await {
            tracing::error!(error = %e, vrm, "Pending subscription creation failed");
            return Err(e);
        }
        tracing::info!(vrm, confirmation_id = %confirmation_id, "Pending subscription created");

        match &pending.sms_confirmation {
            Some(confirmation) => {
                self.notify
                    .send_sms_confirmation_code(&contact.value, &confirmation.code)
                    .await?;
                Ok(PendingSubscriptionOutcome::SmsCodeSent { confirmation_id })
            }
            None => {
                self.notify
                    .send_email_confirmation(&contact.value, &confirmation_id, &vehicle.display_name(vrm))
                    .await?;
                Ok(PendingSubscriptionOutcome::EmailConfirmationSent)
            }
        }
    }

    /// Best effort: the subscriber is told they are subscribed even when the vehicle API is down
    async fn refresh_subscription(&self, mut subscription: Subscription) {
        let vehicle = match self.vehicles.fetch_by_vrm(&subscription.vrm).await {
            Ok(Some(vehicle)) => vehicle,
            Ok(None) => {
                tracing::warn!(vrm = %subscription.vrm, "Vehicle not found, subscription not refreshed");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, vrm = %subscription.vrm, "Vehicle lookup failed, subscription not refreshed");
                return;
            }
        };

        if let Some(due_date) = vehicle.mot_expiry_date {
            subscription.mot_due_date = due_date;
        }
        subscription.vehicle_type = vehicle.vehicle_type;

        match self.subscriptions.save(&subscription).await {
            Ok(()) => tracing::info!(vrm = %subscription.vrm, "Existing subscription refreshed"),
            Err(e) => tracing::error!(error = %e, vrm = %subscription.vrm, "Existing subscription refresh failed"),
        }
    }
}
