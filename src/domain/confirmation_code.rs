use std::str::FromStr;

pub const CODE_LEN: usize = 6;

pub const EMPTY_CODE_MESSAGE: &str = "Enter the code";
pub const INVALID_CODE_MESSAGE: &str = "Enter the 6-digit code from the text message";

/// A six digit code texted to a subscriber to confirm their number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationCode(String);

impl FromStr for ConfirmationCode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();

        if value.is_empty() {
            return Err(EMPTY_CODE_MESSAGE.into());
        }
        if value.len() != CODE_LEN || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(INVALID_CODE_MESSAGE.into());
        }

        Ok(Self(value))
    }
}

impl AsRef<str> for ConfirmationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
