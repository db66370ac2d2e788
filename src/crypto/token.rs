use std::str::FromStr;

use chrono::{DateTime, Utc};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use base64::{
    alphabet,
    engine::{self, general_purpose},
    Engine as _,
};

use super::SigningKey;

lazy_static::lazy_static! {
    pub(crate) static ref BASE64_ENGINE: engine::GeneralPurpose =
        engine::GeneralPurpose::new(&alphabet::URL_SAFE, general_purpose::NO_PAD);
}

/// Various errors that can occur when handling tokens
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,
    #[error("Token signature does not match")]
    SignatureMismatch,
    #[error("Token is expired")]
    Expired,
    #[error("Failed to decode or encode token payload")]
    Payload(#[from] serde_json::Error),
}

impl From<base64::DecodeError> for TokenError {
    fn from(_e: base64::DecodeError) -> Self {
        Self::Malformed
    }
}

pub type TokenResult<T> = Result<T, TokenError>;

/// A JSON payload signed with the application key, serialized as `<payload>.<signature>`
#[derive(Debug, Clone, PartialEq)]
pub struct SignedToken(String);

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    exp: i64,
    data: T,
}

impl SignedToken {
    /// Sign a payload that stops verifying after `expires_at`
    pub fn sign<T: Serialize>(
        payload: &T,
        expires_at: DateTime<Utc>,
        key: &SigningKey,
    ) -> TokenResult<Self> {
        let envelope = Envelope {
            exp: expires_at.timestamp(),
            data: payload,
        };
        let msg = serde_json::to_vec(&envelope)?;
        let sig = key.sign(&msg);

        Ok(Self(format!(
            "{}.{}",
            BASE64_ENGINE.encode(msg),
            BASE64_ENGINE.encode(sig)
        )))
    }

    /// Verify the signature and expiry, then deserialize the payload
    pub fn verify<T: DeserializeOwned>(&self, key: &SigningKey) -> TokenResult<T> {
        let (msg, sig) = self.0.split_once('.').ok_or(TokenError::Malformed)?;
        let msg = BASE64_ENGINE.decode(msg)?;
        let sig = BASE64_ENGINE.decode(sig)?;

        if !key.verify(&msg, &sig) {
            return Err(TokenError::SignatureMismatch);
        }

        let envelope: Envelope<T> = serde_json::from_slice(&msg)?;
        if Utc::now().timestamp() >= envelope.exp {
            return Err(TokenError::Expired);
        }

        Ok(envelope.data)
    }
}

impl AsRef<str> for SignedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for SignedToken {
    type Err = TokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.contains('.') {
            Ok(Self(token.to_string()))
        } else {
            Err(TokenError::Malformed)
        }
    }
}
