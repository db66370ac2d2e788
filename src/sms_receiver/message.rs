use serde::Deserialize;

use crate::domain::{PhoneNumber, Vrm, VrmError};

const STOP_KEYWORD: &str = "STOP";

/// Inbound text message callback from Notify
#[derive(Debug, Clone, Deserialize)]
pub struct InboundSms {
    #[serde(default)]
    pub id: Option<String>,
    pub source_number: String,
    #[serde(default)]
    pub destination_number: Option<String>,
    pub message: String,
    #[serde(default)]
    pub date_received: Option<String>,
}

/// Why an inbound message could not be turned into an unsubscribe request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StopRequestError {
    #[error("Message is not a STOP request with a registration")]
    InsufficientDetails,
    #[error("Invalid vrm sent: {0}")]
    InvalidVrm(VrmError),
}

/// A parsed `STOP <VRM>` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRequest {
    pub vrm: Vrm,
    pub mobile_number: String,
}

impl InboundSms {
    /// Sender in national format, matching how subscriptions store numbers
    pub fn mobile_number(&self) -> String {
        PhoneNumber::normalize(&self.source_number)
    }

    pub fn stop_request(&self) -> Result<StopRequest, StopRequestError> {
        let text = self.message.trim();
        let keyword = text.get(..STOP_KEYWORD.len()).unwrap_or_default();
        if !keyword.eq_ignore_ascii_case(STOP_KEYWORD) {
            return Err(StopRequestError::InsufficientDetails);
        }

        let rest = &text[STOP_KEYWORD.len()..];
        if rest.trim().is_empty() {
            return Err(StopRequestError::InsufficientDetails);
        }

        let vrm = rest.parse::<Vrm>().map_err(StopRequestError::InvalidVrm)?;
        Ok(StopRequest {
            vrm,
            mobile_number: self.mobile_number(),
        })
    }
}
