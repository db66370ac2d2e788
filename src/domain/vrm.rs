use std::fmt;
use std::str::FromStr;

use regex::Regex;

use serde::{Deserialize, Serialize};

pub const MAX_LEN: usize = 13;

lazy_static::lazy_static! {
    static ref VRM_REGEX: Regex = Regex::new(r"^[A-Z0-9-]+$").unwrap();
    static ref TRAILER_ID_REGEX: Regex = Regex::new(r"^[A-Z][0-9]{6}$").unwrap();
}

/// Reasons a registration mark can be rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VrmError {
    #[error("Empty vrm")]
    Empty,
    #[error("Vrm longer than {} characters", MAX_LEN + 1)]
    TooLong,
    #[error("Vrm contains invalid characters")]
    InvalidCharacters,
}

impl VrmError {
    /// The message shown to users of the web form
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Empty => "Enter your vehicle’s registration",
            Self::TooLong => "Registration must be shorter than 14 characters",
            Self::InvalidCharacters => "Registration can only contain letters, numbers and hyphens",
        }
    }
}

/// A vehicle registration mark, normalised to upper case without whitespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vrm(String);

impl Vrm {
    /// Strip every whitespace character and upper-case the rest
    pub fn normalize(value: &str) -> String {
        value
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Trailer ids are one letter followed by six digits
    pub fn is_trailer_id(&self) -> bool {
        TRAILER_ID_REGEX.is_match(&self.0)
    }
}

impl FromStr for Vrm {
    type Err = VrmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = Self::normalize(value);

        if value.is_empty() {
            return Err(VrmError::Empty);
        }
        if value.chars().count() > MAX_LEN {
            return Err(VrmError::TooLong);
        }
        if !VRM_REGEX.is_match(&value) {
            return Err(VrmError::InvalidCharacters);
        }

        Ok(Self(value))
    }
}

impl TryFrom<String> for Vrm {
    type Error = VrmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Vrm> for String {
    fn from(value: Vrm) -> Self {
        value.0
    }
}

impl AsRef<str> for Vrm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vrm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
