use std::sync::Arc;

use crate::crypto;
use crate::domain::ConfirmationCode;
use crate::error::{Error, Result};
use crate::model::{PendingSubscription, SmsConfirmation};
use crate::notify::NotifyService;
use crate::repo::PendingSubscriptionRepository;

pub const MAX_CODE_ATTEMPTS: u32 = 3;
pub const MAX_CODE_RESENDS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeVerification {
    Valid,
    Invalid,
    MaxAttemptsReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeResend {
    Sent,
    Limited,
}

/// Checks and re-sends the codes texted to mobile subscribers
pub struct SmsConfirmationService {
    pending: Arc<dyn PendingSubscriptionRepository>,
    notify: Arc<NotifyService>,
}

impl SmsConfirmationService {
    pub fn new(pending: Arc<dyn PendingSubscriptionRepository>, notify: Arc<NotifyService>) -> Self {
        Self { pending, notify }
    }

    async fn find(&self, confirmation_id: &str) -> Result<(PendingSubscription, SmsConfirmation)> {
        let pending = self
            .pending
            .find_by_confirmation_id(confirmation_id)
            .await?
            .ok_or(Error::InvalidConfirmationId)?;
        let confirmation = pending
            .sms_confirmation
            .clone()
            .ok_or(Error::InvalidConfirmationId)?;

        Ok((pending, confirmation))
    }

    #[tracing::instrument(name = "Verify sms confirmation code", skip(self, code))]
    pub async fn verify(&self, confirmation_id: &str, code: &ConfirmationCode) -> Result<CodeVerification> {
        let (mut pending, mut confirmation) = self.find(confirmation_id).await?;

        if confirmation.failed_attempts >= MAX_CODE_ATTEMPTS {
            return Ok(CodeVerification::MaxAttemptsReached);
        }
        if confirmation.code == code.as_ref() {
            return Ok(CodeVerification::Valid);
        }

        confirmation.failed_attempts += 1;
        let outcome = if confirmation.failed_attempts >= MAX_CODE_ATTEMPTS {
            tracing::warn!(confirmation_id, "Sms confirmation code attempts exhausted");
            CodeVerification::MaxAttemptsReached
        } else {
            CodeVerification::Invalid
        };

        pending.sms_confirmation = Some(confirmation);
        self.pending.save(&pending).await?;
        Ok(outcome)
    }

    /// Text a fresh code, which also resets the failed attempt count
    #[tracing::instrument(name = "Resend sms confirmation code", skip(self))]
    pub async fn resend(&self, confirmation_id: &str) -> Result<CodeResend> {
        let (mut pending, confirmation) = self.find(confirmation_id).await?;

        if confirmation.resends >= MAX_CODE_RESENDS {
            return Ok(CodeResend::Limited);
        }

        let confirmation = SmsConfirmation {
            code: crypto::generate_confirmation_code(),
            failed_attempts: 0,
            resends: confirmation.resends + 1,
        };
        pending.sms_confirmation = Some(confirmation.clone());
        self.pending.save(&pending).await?;

        self.notify
            .send_sms_confirmation_code(&pending.contact.value, &confirmation.code)
            .await?;
        Ok(CodeResend::Sent)
    }
}
