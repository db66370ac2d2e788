use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use thiserror::Error;

use super::views;

pub type RestResult<T> = Result<T, RestError>;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Parse Error: {0}")]
    ParseError(String),

    #[error("Unauthorized Access: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<crate::error::Error> for RestError {
    fn from(e: crate::error::Error) -> Self {
        use crate::error::Error as E;
        match e {
            E::ParsingError(msg) => Self::ParseError(msg),
            E::InvalidConfirmationId => {
                Self::NotFound("That link has expired or has already been used".into())
            }
            E::TokenError(_) => Self::Unauthorized("Failed to verify token".into()),
            E::VehicleNotFound(vrm) => {
                tracing::warn!(vrm = %vrm, "Vehicle not found");
                Self::InternalError("Vehicle lookup".into())
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                Self::InternalError("Something went wrong".into())
            }
        }
    }
}

impl ResponseError for RestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ParseError(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::ParseError(msg) | Self::NotFound(msg) => msg.as_str(),
            Self::Unauthorized(_) => "You are not allowed to view this page",
            Self::InternalError(_) | Self::Other(_) => {
                "Sorry, there is a problem with the service. Try again later."
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(views::error_page(message))
    }
}
