use std::future::{ready, Ready};

use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{dev, web, FromRequest, HttpRequest};

use chrono::{Duration, Utc};

use serde::{Deserialize, Serialize};

use crate::crypto::{SignedToken, SigningKey};
use crate::domain::ContactDetail;
use crate::model::VehicleDetails;

use super::{RestError, RestResult};

pub const SESSION_COOKIE: &str = "motr-session";
const SESSION_LIFETIME_HOURS: i64 = 1;

/// Answers collected by the subscription form, carried in a signed cookie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotrSession {
    pub vrm: Option<String>,
    pub vehicle: Option<VehicleDetails>,
    pub contact: Option<ContactDetail>,
    /// The mobile number as the user typed it, before normalisation
    pub phone_number_entered: Option<String>,
    pub confirmation_id: Option<String>,
    pub visiting_from_review: bool,
}

impl MotrSession {
    /// Tampered, expired or unreadable cookies give an empty session
    pub fn from_cookie(value: &str, key: &SigningKey) -> Self {
        value
            .parse::<SignedToken>()
            .and_then(|token| token.verify(key))
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Discarding session cookie");
                Self::default()
            })
    }

    pub fn cookie(&self, key: &SigningKey) -> RestResult<Cookie<'static>> {
        let expires_at = Utc::now() + Duration::hours(SESSION_LIFETIME_HOURS);
        let token = SignedToken::sign(self, expires_at, key)
            .map_err(|e| RestError::InternalError(format!("Failed to sign session: {}", e)))?;

        Ok(Cookie::build(SESSION_COOKIE, token.as_ref().to_string())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::hours(SESSION_LIFETIME_HOURS))
            .finish())
    }

    /// A cookie that removes the session from the browser
    pub fn removal_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }

    pub fn has_vrm(&self) -> bool {
        self.vrm.is_some()
    }

    pub fn is_allowed_on_review(&self) -> bool {
        self.vrm.is_some() && self.vehicle.is_some() && self.contact.is_some()
    }

    pub fn is_allowed_on_confirm_phone(&self) -> bool {
        self.vrm.is_some()
            && self.confirmation_id.is_some()
            && self.contact.as_ref().map(ContactDetail::is_mobile).unwrap_or(false)
    }
}

fn extract(req: &HttpRequest) -> RestResult<MotrSession> {
    // NOTE: Must be registered with the application at startup
    let key = req
        .app_data::<web::Data<SigningKey>>()
        .ok_or_else(|| RestError::InternalError("Signing key not registered".into()))?;

    Ok(req
        .cookie(SESSION_COOKIE)
        .map(|cookie| MotrSession::from_cookie(cookie.value(), key))
        .unwrap_or_default())
}

impl FromRequest for MotrSession {
    type Error = RestError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(extract(req))
    }
}
