use std::fmt;
use std::str::FromStr;

use regex::Regex;

use serde::{Deserialize, Serialize};

pub const EMPTY_PHONE_NUMBER_MESSAGE: &str = "Enter your mobile number";
pub const INVALID_PHONE_NUMBER_MESSAGE: &str = "Enter a valid UK mobile number";

lazy_static::lazy_static! {
    static ref UK_MOBILE_REGEX: Regex = Regex::new(r"^07[0-9]{9}$").unwrap();
}

/// A UK mobile number in national format, e.g. `07123456789`
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Replace an international `44` dialling prefix with the national `0`
    pub fn normalize(value: &str) -> String {
        let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();

        ["+44", "0044", "44"]
            .iter()
            .find_map(|prefix| value.strip_prefix(prefix))
            .map(|rest| format!("0{}", rest))
            .unwrap_or(value)
    }
}

impl FromStr for PhoneNumber {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().is_empty() {
            return Err(EMPTY_PHONE_NUMBER_MESSAGE.into());
        }

        let value = Self::normalize(value);
        if !UK_MOBILE_REGEX.is_match(&value) {
            return Err(INVALID_PHONE_NUMBER_MESSAGE.into());
        }

        Ok(Self(value))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
