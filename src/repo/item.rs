use std::collections::HashMap;
use std::str::FromStr;

use aws_sdk_dynamodb::types::AttributeValue;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{ContactDetail, ContactType, MotIdentification, VehicleType};
use crate::error::{Error, Result};

pub(crate) type Item = HashMap<String, AttributeValue>;

pub(crate) fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

pub(crate) fn n(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// `MM-dd` form of a due date, used as the due-date index key
pub(crate) fn month_day(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

fn missing(key: &str) -> Error {
    Error::DatabaseError(anyhow::anyhow!("Item is missing attribute `{}`", key))
}

fn malformed(key: &str, reason: impl std::fmt::Display) -> Error {
    Error::DatabaseError(anyhow::anyhow!("Attribute `{}` is malformed: {}", key, reason))
}

pub(crate) fn optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|value| value.as_s().ok())
        .filter(|value| !value.is_empty())
        .cloned()
}

pub(crate) fn string(item: &Item, key: &str) -> Result<String> {
    optional_string(item, key).ok_or_else(|| missing(key))
}

pub(crate) fn number<T: FromStr>(item: &Item, key: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    item.get(key)
        .and_then(|value| value.as_n().ok())
        .ok_or_else(|| missing(key))?
        .parse()
        .map_err(|e| malformed(key, e))
}

pub(crate) fn date(item: &Item, key: &str) -> Result<NaiveDate> {
    string(item, key)?
        .parse()
        .map_err(|e| malformed(key, e))
}

pub(crate) fn timestamp(item: &Item, key: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&string(item, key)?)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| malformed(key, e))
}

pub(crate) fn optional_timestamp(item: &Item, key: &str) -> Result<Option<DateTime<Utc>>> {
    match optional_string(item, key) {
        Some(_) => timestamp(item, key).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn vehicle_type(item: &Item) -> Result<VehicleType> {
    match optional_string(item, "vehicle_type") {
        Some(value) => value.parse().map_err(|e| malformed("vehicle_type", e)),
        None => Ok(VehicleType::default()),
    }
}

/// Contacts are stored under `email` whatever their type; older records have no `contact_type`
pub(crate) fn contact(item: &Item) -> Result<ContactDetail> {
    let value = string(item, "email")?;
    let contact_type = match optional_string(item, "contact_type") {
        Some(value) => value
            .parse::<ContactType>()
            .map_err(|e| malformed("contact_type", e))?,
        None => ContactType::Email,
    };

    Ok(ContactDetail::new(value, contact_type))
}

pub(crate) fn mot_identification(item: &Item) -> Result<MotIdentification> {
    MotIdentification::from_parts(
        optional_string(item, "mot_test_number").as_deref(),
        optional_string(item, "dvla_id").as_deref(),
    )
    .ok_or_else(|| missing("mot_test_number"))
}

pub(crate) fn put_contact(item: &mut Item, contact: &ContactDetail) {
    item.insert("email".into(), s(&contact.value));
    item.insert("contact_type".into(), s(contact.contact_type.as_str()));
}

pub(crate) fn put_mot_identification(item: &mut Item, id: &MotIdentification) {
    match id {
        MotIdentification::MotTestNumber(number) => item.insert("mot_test_number".into(), s(number)),
        MotIdentification::DvlaId(id) => item.insert("dvla_id".into(), s(id)),
    };
}

pub(crate) fn put_due_date(item: &mut Item, due_date: NaiveDate) {
    item.insert("mot_due_date".into(), s(due_date.to_string()));
    item.insert("mot_due_date_md".into(), s(month_day(due_date)));
}
