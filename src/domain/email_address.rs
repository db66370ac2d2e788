use std::fmt;
use std::str::FromStr;

use regex::Regex;

use serde::{Deserialize, Serialize};

use unicode_segmentation::UnicodeSegmentation;

const MAX_LEN: usize = 254;

pub const EMPTY_EMAIL_MESSAGE: &str = "Enter your email address";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address";

/// A user supplied email-address
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl FromStr for EmailAddress {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").unwrap();
        }

        let value = value.trim();

        if value.is_empty() {
            return Err(EMPTY_EMAIL_MESSAGE.into());
        }
        if value.graphemes(true).count() > MAX_LEN || !EMAIL_REGEX.is_match(value) {
            return Err(INVALID_EMAIL_MESSAGE.into());
        }

        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
