use async_trait::async_trait;

use aws_sdk_dynamodb::Client;

use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::model::Subscription;

use super::item::{self, s, Item};
use super::SubscriptionRepository;

const ID_INDEX: &str = "id-gsi";
const DUE_DATE_INDEX: &str = "due-date-md-gsi";

/// DynamoDB-backed subscription table, keyed on (`vrm`, `email`)
#[derive(Debug, Clone)]
pub struct DynamoSubscriptionRepo {
    client: Client,
    table: String,
}

impl DynamoSubscriptionRepo {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

impl TryFrom<&Item> for Subscription {
    type Error = Error;

    fn try_from(item: &Item) -> Result<Self> {
        Ok(Self {
            id: item::string(item, "id")?,
            vrm: item::string(item, "vrm")?,
            contact: item::contact(item)?,
            mot_identification: item::mot_identification(item)?,
            mot_due_date: item::date(item, "mot_due_date")?,
            vehicle_type: item::vehicle_type(item)?,
            created_at: item::timestamp(item, "created_at")?,
            updated_at: item::optional_timestamp(item, "updated_at")?,
        })
    }
}

impl From<&Subscription> for Item {
    fn from(subscription: &Subscription) -> Self {
        let mut item = Item::new();
        item.insert("id".into(), s(&subscription.id));
        item.insert("vrm".into(), s(&subscription.vrm));
        item::put_contact(&mut item, &subscription.contact);
        item::put_mot_identification(&mut item, &subscription.mot_identification);
        item::put_due_date(&mut item, subscription.mot_due_date);
        item.insert("vehicle_type".into(), s(subscription.vehicle_type.as_str()));
        item.insert("created_at".into(), s(subscription.created_at.to_rfc3339()));
        item.insert("updated_at".into(), s(Utc::now().to_rfc3339()));
        item
    }
}

#[async_trait]
impl SubscriptionRepository for DynamoSubscriptionRepo {
    #[tracing::instrument(name = "Find subscription by vrm and contact", skip(self))]
    async fn find_by_vrm_and_contact(&self, vrm: &str, contact: &str) -> Result<Option<Subscription>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("vrm", s(vrm))
            .key("email", s(contact))
            .send()
            .await
            .map_err(Error::database)?;

        output.item.as_ref().map(Subscription::try_from).transpose()
    }

    #[tracing::instrument(name = "Find subscription by id", skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>> {
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
            .map(Subscription::try_from)
            .transpose()
    }

    #[tracing::instrument(name = "Find subscriptions due on date", skip(self))]
    async fn find_due_on(&self, date: NaiveDate) -> Result<Vec<Subscription>> {
        let mut subscriptions = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table)
                .index_name(DUE_DATE_INDEX)
                .key_condition_expression("mot_due_date_md = :md")
                .filter_expression("mot_due_date = :date")
                .expression_attribute_values(":md", s(item::month_day(date)))
                .expression_attribute_values(":date", s(date.to_string()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(Error::database)?;

            for item in output.items.unwrap_or_default() {
                match Subscription::try_from(&item) {
                    Ok(subscription) => subscriptions.push(subscription),
                    Err(e) => tracing::warn!(error = %e, "Skipping unreadable subscription record"),
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Save subscription", skip(self, subscription), fields(vrm = %subscription.vrm))]
    async fn save(&self, subscription: &Subscription) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(subscription.into()))
            .send()
            .await
            .map_err(Error::database)?;

        Ok(())
    }

    #[tracing::instrument(name = "Delete subscription", skip(self, subscription), fields(vrm = %subscription.vrm))]
    async fn delete(&self, subscription: &Subscription) -> Result<()> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table)
            .key("vrm", s(&subscription.vrm))
            .key("email", s(&subscription.contact.value))
            .condition_expression("id = :id")
            .expression_attribute_values(":id", s(&subscription.id))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e.as_service_error()
                    .map(|e| e.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                tracing::info!(id = %subscription.id, "Subscription was already deleted");
                Ok(())
            }
            Err(e) => Err(Error::database(e)),
        }
    }
}
