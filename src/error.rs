use aws_sdk_dynamodb::error::DisplayErrorContext;

use crate::crypto::TokenError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Parsing errors
    #[error("{0}")]
    ParsingError(String),
    // Subscription lifecycle errors
    #[error("No pending subscription for confirmation id")]
    InvalidConfirmationId,
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),
    // REST client errors
    #[error("Vehicle details API request failed: {0}")]
    VehicleApiError(reqwest::Error),
    #[error("Failed to send notification: {0}")]
    NotifyError(reqwest::Error),
    // Signed token errors
    #[error(transparent)]
    TokenError(#[from] TokenError),
    // Storage errors
    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),
    #[error("Queue error: {0}")]
    QueueError(anyhow::Error),
    #[error(transparent)]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Wrap an AWS SDK error from a DynamoDB call, keeping the full source chain in the message
    pub(crate) fn database<E: std::error::Error>(e: E) -> Self {
        Self::DatabaseError(anyhow::anyhow!("{}", DisplayErrorContext(e)))
    }
    /// Wrap an AWS SDK error from an SQS call
    pub(crate) fn queue<E: std::error::Error>(e: E) -> Self {
        Self::QueueError(anyhow::anyhow!("{}", DisplayErrorContext(e)))
    }
}
