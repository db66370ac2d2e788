use std::sync::Arc;

use crate::error::Result;
use crate::notify::NotifyService;
use crate::repo::{CancelledSubscriptionRepository, SubscriptionRepository};
use crate::subscription::UnsubscribeService;

use super::{InboundSms, StopRequestError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmsOutcome {
    Unsubscribed,
    AlreadyUnsubscribed,
    SubscriptionNotFound,
    InvalidVrm,
    InsufficientDetails,
}

/// Unsubscribes mobile subscribers who text `STOP <VRM>`
pub struct SmsMessageProcessor {
    subscriptions: Arc<dyn SubscriptionRepository>,
    cancelled: Arc<dyn CancelledSubscriptionRepository>,
    unsubscribe: Arc<UnsubscribeService>,
    notify: Arc<NotifyService>,
}

impl SmsMessageProcessor {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        cancelled: Arc<dyn CancelledSubscriptionRepository>,
        unsubscribe: Arc<UnsubscribeService>,
        notify: Arc<NotifyService>,
    ) -> Self {
        Self {
            subscriptions,
            cancelled,
            unsubscribe,
            notify,
        }
    }

    #[tracing::instrument(name = "Process inbound sms", skip(self, sms), fields(id = ?sms.id))]
    pub async fn process(&self, sms: &InboundSms) -> Result<SmsOutcome> {
        let request = match sms.stop_request() {
            Ok(request) => request,
            Err(StopRequestError::InsufficientDetails) => {
                tracing::warn!("Unable to process message, insufficient details");
                return Ok(SmsOutcome::InsufficientDetails);
            }
            Err(StopRequestError::InvalidVrm(e)) => {
                tracing::warn!(reason = %e, "Invalid vrm sent");
                return Ok(SmsOutcome::InvalidVrm);
            }
        };
        let vrm = request.vrm.as_ref();
        let mobile = &request.mobile_number;

        if let Some(subscription) = self.subscriptions.find_by_vrm_and_contact(vrm, mobile).await? {
            self.unsubscribe.cancel(&subscription).await?;
            self.notify
                .send_sms_unsubscription_confirmation(mobile, vrm)
                .await?;
            return Ok(SmsOutcome::Unsubscribed);
        }

        if self.cancelled.find_by_vrm_and_contact(vrm, mobile).await?.is_some() {
            tracing::info!(vrm, "User already unsubscribed");
            Ok(SmsOutcome::AlreadyUnsubscribed)
        } else {
            tracing::warn!(vrm, "Failed to find subscription");
            Ok(SmsOutcome::SubscriptionNotFound)
        }
    }
}
