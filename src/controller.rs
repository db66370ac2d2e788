use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpResponse};

use crate::crypto::SigningKey;

mod confirm;
mod contact;
mod error;
mod pages;
mod review;
pub mod session;
pub mod sms_receiver;
mod unsubscribe;
pub(crate) mod views;
mod vrm;

pub use error::*;
pub use session::MotrSession;

/// Register every subscription journey endpoint
pub fn configure(cfg: &mut web::ServiceConfig) {
    pages::configure(cfg);
    vrm::configure(cfg);
    contact::configure(cfg);
    review::configure(cfg);
    confirm::configure(cfg);
    unsubscribe::configure(cfg);
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect after storing the session in its cookie
pub(crate) fn see_other_with_session(
    location: &str,
    session: &MotrSession,
    signing_key: &SigningKey,
) -> RestResult<HttpResponse> {
    let cookie = session.cookie(signing_key)?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish())
}
