use chrono::NaiveDate;

use crate::client::Personalisation;

use super::ReminderTier;

fn long_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%y").to_string()
}

/// Values for a reminder email
pub fn reminder_email(
    tier: ReminderTier,
    vehicle_details: &str,
    expiry_date: NaiveDate,
    has_mot_test_number: bool,
    unsubscribe_link: &str,
) -> Personalisation {
    let mut values = Personalisation::new();
    values.insert("vehicle_details", vehicle_details.to_string());
    values.insert("unsubscribe_link", unsubscribe_link.to_string());

    if tier == ReminderTier::OneDayAfter {
        let was_due_or_expired = if has_mot_test_number { "expired" } else { "was due" };
        values.insert("was_due_or_expired", was_due_or_expired.into());
        return values;
    }

    let is_due_or_expires = if has_mot_test_number { "expires" } else { "is due" };
    values.insert("mot_expiry_date", long_date(expiry_date));
    values.insert("is_due_or_expires", is_due_or_expires.into());

    if tier == ReminderTier::OneMonth {
        let preservation_statement = if has_mot_test_number {
            format!(
                "You can get your MOT test done from tomorrow to keep the same expiry date {} for next year.",
                expiry_date.format("%-d %B")
            )
        } else {
            String::new()
        };
        values.insert("preservation_statement", preservation_statement);
    }

    values
}

/// Values for a reminder text message
pub fn reminder_sms(tier: ReminderTier, vrm: &str, expiry_date: NaiveDate) -> Personalisation {
    let mut values = Personalisation::new();
    values.insert("vehicle_vrm", vrm.to_string());

    if tier != ReminderTier::OneDayAfter {
        values.insert("mot_expiry_date", short_date(expiry_date));
    }

    values
}

pub fn email_confirmation(confirmation_link: &str, vehicle_details: &str) -> Personalisation {
    let mut values = Personalisation::new();
    values.insert("confirmation_link", confirmation_link.to_string());
    values.insert("vehicle_details", vehicle_details.to_string());
    values
}

pub fn sms_confirmation_code(code: &str) -> Personalisation {
    let mut values = Personalisation::new();
    values.insert("confirmation_code", code.to_string());
    values
}

pub fn sms_unsubscription_confirmation(vrm: &str) -> Personalisation {
    let mut values = Personalisation::new();
    values.insert("vehicle_vrm", vrm.to_string());
    values
}
