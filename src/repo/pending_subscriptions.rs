use async_trait::async_trait;

use aws_sdk_dynamodb::Client;

use chrono::{Duration, Utc};

use crate::error::{Error, Result};
use crate::model::{PendingSubscription, SmsConfirmation};

use super::item::{self, n, s, Item};
use super::PendingSubscriptionRepository;

const ID_INDEX: &str = "id-vt-gsi";

/// Pending records are removed by the table's TTL on `deletion_date` after this long
pub const PENDING_SUBSCRIPTION_TTL_HOURS: i64 = 24;

/// DynamoDB-backed pending subscription table, keyed on (`vrm`, `email`)
#[derive(Debug, Clone)]
pub struct DynamoPendingSubscriptionRepo {
    client: Client,
    table: String,
}

impl DynamoPendingSubscriptionRepo {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

impl TryFrom<&Item> for PendingSubscription {
    type Error = Error;

    fn try_from(item: &Item) -> Result<Self> {
        let sms_confirmation = match item::optional_string(item, "confirmation_code") {
            Some(code) => Some(SmsConfirmation {
                code,
                failed_attempts: item::number(item, "code_attempts").unwrap_or(0),
                resends: item::number(item, "code_resends").unwrap_or(0),
            }),
            None => None,
        };

        Ok(Self {
            confirmation_id: item::string(item, "id")?,
            vrm: item::string(item, "vrm")?,
            contact: item::contact(item)?,
            mot_identification: item::mot_identification(item)?,
            mot_due_date: item::date(item, "mot_due_date")?,
            vehicle_type: item::vehicle_type(item)?,
            created_at: item::timestamp(item, "created_at")?,
            sms_confirmation,
        })
    }
}

impl From<&PendingSubscription> for Item {
    fn from(pending: &PendingSubscription) -> Self {
        let deletion_date = pending.created_at + Duration::hours(PENDING_SUBSCRIPTION_TTL_HOURS);

        let mut item = Item::new();
        item.insert("id".into(), s(&pending.confirmation_id));
        item.insert("vrm".into(), s(&pending.vrm));
        item::put_contact(&mut item, &pending.contact);
        item::put_mot_identification(&mut item, &pending.mot_identification);
        item::put_due_date(&mut item, pending.mot_due_date);
        item.insert("vehicle_type".into(), s(pending.vehicle_type.as_str()));
        item.insert("created_at".into(), s(pending.created_at.to_rfc3339()));
        item.insert("deletion_date".into(), n(deletion_date.timestamp()));

        if let Some(confirmation) = &pending.sms_confirmation {
            item.insert("confirmation_code".into(), s(&confirmation.code));
            item.insert("code_attempts".into(), n(confirmation.failed_attempts));
            item.insert("code_resends".into(), n(confirmation.resends));
        }
        item
    }
}

#[async_trait]
impl PendingSubscriptionRepository for DynamoPendingSubscriptionRepo {
    #[tracing::instrument(name = "Find pending subscription by confirmation id", skip(self))]
    async fn find_by_confirmation_id(&self, id: &str) -> Result<Option<PendingSubscription>> {
        let output = self
            .client
            .query()
            .table_name(&self.table)
            .index_name(ID_INDEX)
            .key_condition_expression("id = :id")
            .expression_attribute_values(":id", s(id))
            .send()
            .await
            .map_err(Error::database)?;

        output
            .items
            .unwrap_or_default()
            .first()
            .map(PendingSubscription::try_from)
            .transpose()
    }

    #[tracing::instrument(name = "Find pending subscription by vrm and contact", skip(self))]
    async fn find_by_vrm_and_contact(
        &self,
        vrm: &str,
        contact: &str,
    ) -> Result<Option<PendingSubscription>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("vrm", s(vrm))
            .key("email", s(contact))
            .send()
            .await
            .map_err(Error::database)?;

        output.item.as_ref().map(PendingSubscription::try_from).transpose()
    }

    #[tracing::instrument(name = "Save pending subscription", skip(self, pending), fields(vrm = %pending.vrm))]
    async fn save(&self, pending: &PendingSubscription) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(pending.into()))
            .send()
            .await
            .map_err(Error::database)?;

        Ok(())
    }

    #[tracing::instrument(name = "Delete pending subscription", skip(self, pending), fields(vrm = %pending.vrm))]
    async fn delete(&self, pending: &PendingSubscription) -> Result<()> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table)
            .key("vrm", s(&pending.vrm))
            .key("email", s(&pending.contact.value))
            .condition_expression("id = :id")
            .expression_attribute_values(":id", s(&pending.confirmation_id))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .map(|e| e.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                tracing::info!(
                    confirmation_id = %pending.confirmation_id,
                    "Pending subscription was already deleted"
                );
                Ok(())
            }
            Err(e) => Err(Error::database(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::domain::{ContactDetail, ContactType, MotIdentification, VehicleType};

    use super::*;

    fn pending(sms_confirmation: Option<SmsConfirmation>) -> PendingSubscription {
        PendingSubscription {
            confirmation_id: "confirmation-id".into(),
            vrm: "AB12CDE".into(),
            contact: ContactDetail::new("07123456789", ContactType::Mobile),
            mot_identification: MotIdentification::MotTestNumber("123456".into()),
            mot_due_date: NaiveDate::from_ymd_opt(2017, 10, 10).unwrap(),
            vehicle_type: VehicleType::Mot,
            created_at: Utc::now(),
            sms_confirmation,
        }
    }

    #[test]
    fn deletion_date_is_a_day_after_creation() {
        let pending = pending(None);
        let item = Item::from(&pending);

        let deletion_date: i64 = item::number(&item, "deletion_date").unwrap();
        assert_eq!(deletion_date - pending.created_at.timestamp(), 24 * 60 * 60);
    }

    #[test]
    fn sms_confirmation_state_is_stored() {
        let mut confirmation = SmsConfirmation::new("123456".into());
        confirmation.failed_attempts = 2;
        let pending = pending(Some(confirmation.clone()));

        let read = PendingSubscription::try_from(&Item::from(&pending)).unwrap();
        assert_eq!(read.sms_confirmation, Some(confirmation));
    }
}
