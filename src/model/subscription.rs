use chrono::{DateTime, NaiveDate, Utc};

use serde::{Deserialize, Serialize};

use crate::domain::{ContactDetail, MotIdentification, VehicleType};

/// A confirmed reminder subscription, unique per (vrm, contact)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unsubscribe id, used in unsubscribe links
    pub id: String,
    pub vrm: String,
    pub contact: ContactDetail,
    pub mot_identification: MotIdentification,
    pub mot_due_date: NaiveDate,
    pub vehicle_type: VehicleType,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// An unconfirmed subscription, waiting on the email link or the texted code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSubscription {
    pub confirmation_id: String,
    pub vrm: String,
    pub contact: ContactDetail,
    pub mot_identification: MotIdentification,
    pub mot_due_date: NaiveDate,
    pub vehicle_type: VehicleType,
    pub created_at: DateTime<Utc>,
    /// Only present for mobile contacts
    pub sms_confirmation: Option<SmsConfirmation>,
}

/// State of the code texted to a mobile subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsConfirmation {
    pub code: String,
    pub failed_attempts: u32,
    pub resends: u32,
}

impl SmsConfirmation {
    pub fn new(code: String) -> Self {
        Self {
            code,
            failed_attempts: 0,
            resends: 0,
        }
    }
}

impl PendingSubscription {
    /// Promote into a confirmed subscription with a freshly issued unsubscribe id
    pub fn confirm(self, unsubscribe_id: String) -> Subscription {
        Subscription {
            id: unsubscribe_id,
            vrm: self.vrm,
            contact: self.contact,
            mot_identification: self.mot_identification,
            mot_due_date: self.mot_due_date,
            vehicle_type: self.vehicle_type,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Archived copy of a subscription that has been unsubscribed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelledSubscription {
    pub id: String,
    pub vrm: String,
    pub contact: ContactDetail,
    pub mot_identification: MotIdentification,
    pub vehicle_type: VehicleType,
    pub reason_for_cancellation: String,
    pub cancelled_at: DateTime<Utc>,
}

pub const USER_CANCELLED: &str = "User cancelled";

impl CancelledSubscription {
    pub fn from_subscription(subscription: &Subscription, reason: &str) -> Self {
        Self {
            id: subscription.id.clone(),
            vrm: subscription.vrm.clone(),
            contact: subscription.contact.clone(),
            mot_identification: subscription.mot_identification.clone(),
            vehicle_type: subscription.vehicle_type,
            reason_for_cancellation: reason.to_string(),
            cancelled_at: Utc::now(),
        }
    }
}
