use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EmailAddress, PhoneNumber};

/// The channel a subscriber is reminded through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactType {
    Email,
    Mobile,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Mobile => "MOBILE",
        }
    }
}

impl FromStr for ContactType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "EMAIL" => Ok(Self::Email),
            "MOBILE" => Ok(Self::Mobile),
            other => Err(format!("{} is not a contact type", other)),
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An email address or mobile number, tagged with its type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactDetail {
    pub value: String,
    pub contact_type: ContactType,
}

impl ContactDetail {
    pub fn new(value: impl Into<String>, contact_type: ContactType) -> Self {
        Self {
            value: value.into(),
            contact_type,
        }
    }

    pub fn is_email(&self) -> bool {
        self.contact_type == ContactType::Email
    }

    pub fn is_mobile(&self) -> bool {
        self.contact_type == ContactType::Mobile
    }
}

impl From<EmailAddress> for ContactDetail {
    fn from(email: EmailAddress) -> Self {
        Self::new(email.as_ref(), ContactType::Email)
    }
}

impl From<PhoneNumber> for ContactDetail {
    fn from(number: PhoneNumber) -> Self {
        Self::new(number.as_ref(), ContactType::Mobile)
    }
}
