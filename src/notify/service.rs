use chrono::NaiveDate;

use url::Url;

use crate::client::NotifyClient;
use crate::error::Result;
use crate::model::{SubscriptionQueueItem, VehicleDetails};
use crate::settings::TemplateSettings;

use super::{personalisation, ReminderTier};

/// Builds and sends every message the service delivers through Notify
#[derive(Debug)]
pub struct NotifyService {
    client: NotifyClient,
    templates: TemplateSettings,
    base_url: Url,
}

impl NotifyService {
    pub fn new(client: NotifyClient, templates: TemplateSettings, base_url: Url) -> Self {
        Self {
            client,
            templates,
            base_url,
        }
    }

    fn link(&self, path: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url.as_str().trim_end_matches('/'), path, id)
    }

    pub fn confirmation_link(&self, confirmation_id: &str) -> String {
        self.link("confirm-subscription", confirmation_id)
    }

    pub fn unsubscribe_link(&self, unsubscribe_id: &str) -> String {
        self.link("unsubscribe", unsubscribe_id)
    }

    #[tracing::instrument(name = "Send email confirmation", skip(self, email_address))]
    pub async fn send_email_confirmation(
        &self,
        email_address: &str,
        confirmation_id: &str,
        vehicle_details: &str,
    ) -> Result<()> {
        let values =
            personalisation::email_confirmation(&self.confirmation_link(confirmation_id), vehicle_details);

        self.client
            .send_email(email_address, &self.templates.email_confirmation, &values, "")
            .await
    }

    #[tracing::instrument(name = "Send sms confirmation code", skip(self, phone_number, code))]
    pub async fn send_sms_confirmation_code(&self, phone_number: &str, code: &str) -> Result<()> {
        let values = personalisation::sms_confirmation_code(code);

        self.client
            .send_sms(phone_number, &self.templates.sms_confirmation_code, &values, "")
            .await
    }

    #[tracing::instrument(name = "Send sms unsubscription confirmation", skip(self, phone_number))]
    pub async fn send_sms_unsubscription_confirmation(&self, phone_number: &str, vrm: &str) -> Result<()> {
        let values = personalisation::sms_unsubscription_confirmation(vrm);

        self.client
            .send_sms(
                phone_number,
                &self.templates.sms_unsubscription_confirmation,
                &values,
                "",
            )
            .await
    }

    /// Send the reminder for `tier` through the subscriber's channel
    #[tracing::instrument(name = "Send reminder", skip(self, item, vehicle), fields(id = %item.id, tier = tier.name()))]
    pub async fn send_reminder(
        &self,
        tier: ReminderTier,
        item: &SubscriptionQueueItem,
        vehicle: &VehicleDetails,
        expiry_date: NaiveDate,
    ) -> Result<()> {
        let contact = &item.contact;
        let has_mot_test_number = item.mot_test_number.is_some();

        if contact.is_email() {
            let values = personalisation::reminder_email(
                tier,
                &vehicle.display_name(&item.vrm),
                expiry_date,
                has_mot_test_number,
                &self.unsubscribe_link(&item.id),
            );
            let template_id = tier.template_id(&self.templates.email_reminders);

            self.client
                .send_email(&contact.value, template_id, &values, "")
                .await
        } else {
            let values = personalisation::reminder_sms(tier, &item.vrm, expiry_date);
            let template_id = tier.template_id(&self.templates.sms_reminders);

            self.client
                .send_sms(&contact.value, template_id, &values, "")
                .await
        }
    }
}
