use async_trait::async_trait;

use aws_sdk_dynamodb::Client;

use crate::error::{Error, Result};
use crate::model::CancelledSubscription;

use super::item::{self, s, Item};
use super::CancelledSubscriptionRepository;

const VRM_CONTACT_INDEX: &str = "vrm-email-gsi";

/// DynamoDB-backed archive of cancelled subscriptions, keyed on `id`
#[derive(Debug, Clone)]
pub struct DynamoCancelledSubscriptionRepo {
    client: Client,
    table: String,
}

impl DynamoCancelledSubscriptionRepo {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

impl TryFrom<&Item> for CancelledSubscription {
    type Error = Error;

    fn try_from(item: &Item) -> Result<Self> {
        Ok(Self {
            id: item::string(item, "id")?,
            vrm: item::string(item, "vrm")?,
            contact: item::contact(item)?,
            mot_identification: item::mot_identification(item)?,
            vehicle_type: item::vehicle_type(item)?,
            reason_for_cancellation: item::string(item, "reason_for_cancellation")?,
            cancelled_at: item::timestamp(item, "cancelled_at")?,
        })
    }
}

impl From<&CancelledSubscription> for Item {
    fn from(cancelled: &CancelledSubscription) -> Self {
        let mut item = Item::new();
        item.insert("id".into(), s(&cancelled.id));
        item.insert("vrm".into(), s(&cancelled.vrm));
        item::put_contact(&mut item, &cancelled.contact);
        item::put_mot_identification(&mut item, &cancelled.mot_identification);
        item.insert("vehicle_type".into(), s(cancelled.vehicle_type.as_str()));
        item.insert(
            "reason_for_cancellation".into(),
            s(&cancelled.reason_for_cancellation),
        );
        item.insert("cancelled_at".into(), s(cancelled.cancelled_at.to_rfc3339()));
        item
    }
}

#[async_trait]
impl CancelledSubscriptionRepository for DynamoCancelledSubscriptionRepo {
    #[tracing::instrument(name = "Save cancelled subscription", skip(self, cancelled), fields(vrm = %cancelled.vrm))]
    async fn save(&self, cancelled: &CancelledSubscription) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(cancelled.into()))
            .send()
            .await
            .map_err(Error::database)?;

        Ok(())
    }

    #[tracing::instrument(name = "Find cancelled subscription by vrm and contact", skip(self))]
    async fn find_by_vrm_and_contact(
        &self,
        vrm: &str,
        contact: &str,
    ) -> Result<Option<CancelledSubscription>> {
        let output = self
            .client
            .query()
            .table_name(&self.table)
            .index_name(VRM_CONTACT_INDEX)
            .key_condition_expression("vrm = :vrm AND email = :email")
            .expression_attribute_values(":vrm", s(vrm))
            .expression_attribute_values(":email", s(contact))
            .send()
            .await
            .map_err(Error::database)?;

        output
            .items
            .unwrap_or_default()
            .first()
            .map(CancelledSubscription::try_from)
            .transpose()
    }
}
