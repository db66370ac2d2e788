use chrono::NaiveDate;

use serde::{Deserialize, Serialize};

use crate::domain::{ContactDetail, MotIdentification, VehicleType};

use super::Subscription;

/// A subscription due for a reminder, as carried on the notification queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionQueueItem {
    pub id: String,
    pub vrm: String,
    pub contact: ContactDetail,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mot_test_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dvla_id: Option<String>,
    pub mot_due_date: NaiveDate,
    pub vehicle_type: VehicleType,
    /// The date the loader ran, and so the date reminder tiers are measured from
    pub loaded_on_date: NaiveDate,
}

impl SubscriptionQueueItem {
    pub fn from_subscription(subscription: &Subscription, loaded_on_date: NaiveDate) -> Self {
        let id = &subscription.mot_identification;

        Self {
            id: subscription.id.clone(),
            vrm: subscription.vrm.clone(),
            contact: subscription.contact.clone(),
            mot_test_number: id.mot_test_number().map(String::from),
            dvla_id: id.dvla_id().map(String::from),
            mot_due_date: subscription.mot_due_date,
            vehicle_type: subscription.vehicle_type,
            loaded_on_date,
        }
    }

    pub fn mot_identification(&self) -> Option<MotIdentification> {
        MotIdentification::from_parts(self.mot_test_number.as_deref(), self.dvla_id.as_deref())
    }
}
