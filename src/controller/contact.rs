use actix_web::{get, post, web, HttpResponse};

use serde::Deserialize;

use crate::crypto::SigningKey;
use crate::domain::{ContactDetail, EmailAddress, PhoneNumber};

use super::{html, see_other, see_other_with_session, views, MotrSession, RestResult};

const CHANNEL_NOT_CHOSEN_MESSAGE: &str = "Choose a type of reminder";

#[derive(Debug, Deserialize)]
pub struct ChannelForm {
    #[serde(default)]
    channel: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    #[serde(rename = "emailAddress", default)]
    email_address: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneNumberForm {
    #[serde(rename = "phoneNumber", default)]
    phone_number: String,
}

#[get("/channel-selection")]
async fn show_channel_selection(session: MotrSession) -> RestResult<HttpResponse> {
    if !session.has_vrm() {
        return Ok(see_other("/"));
    }
    Ok(html(views::channel_selection_page(None)))
}

#[post("/channel-selection")]
async fn submit_channel_selection(
    session: MotrSession,
    form: web::Form<ChannelForm>,
) -> RestResult<HttpResponse> {
    if !session.has_vrm() {
        return Ok(see_other("/"));
    }

    match form.channel.as_str() {
        "email" => Ok(see_other("/email")),
        "text" => Ok(see_other("/phone-number")),
        _ => Ok(html(views::channel_selection_page(Some(CHANNEL_NOT_CHOSEN_MESSAGE)))),
    }
}

fn email_entered(session: &MotrSession) -> &str {
    session
        .contact
        .as_ref()
        .filter(|contact| contact.is_email())
        .map(|contact| contact.value.as_str())
        .unwrap_or_default()
}

#[get("/email")]
async fn show_email(session: MotrSession) -> RestResult<HttpResponse> {
    if !session.has_vrm() {
        return Ok(see_other("/"));
    }
    Ok(html(views::email_page(email_entered(&session), None)))
}

#[tracing::instrument(name = "Submit email address", skip(signing_key, session, form))]
#[post("/email")]
async fn submit_email(
    signing_key: web::Data<SigningKey>,
    mut session: MotrSession,
    form: web::Form<EmailForm>,
) -> RestResult<HttpResponse> {
    if !session.has_vrm() {
        return Ok(see_other("/"));
    }

    let email = match form.email_address.parse::<EmailAddress>() {
        Ok(email) => email,
        Err(message) => return Ok(html(views::email_page(&form.email_address, Some(&message)))),
    };

    session.contact = Some(ContactDetail::from(email));
    session.phone_number_entered = None;
    session.confirmation_id = None;
    see_other_with_session("/review", &session, &signing_key)
}

#[get("/phone-number")]
async fn show_phone_number(session: MotrSession) -> RestResult<HttpResponse> {
    if !session.has_vrm() {
        return Ok(see_other("/"));
    }
    Ok(html(views::phone_number_page(
        session.phone_number_entered.as_deref().unwrap_or_default(),
        None,
    )))
}

#[tracing::instrument(name = "Submit mobile number", skip(signing_key, session, form))]
#[post("/phone-number")]
async fn submit_phone_number(
    signing_key: web::Data<SigningKey>,
    mut session: MotrSession,
    form: web::Form<PhoneNumberForm>,
) -> RestResult<HttpResponse> {
    if !session.has_vrm() {
        return Ok(see_other("/"));
    }

    let phone_number = match form.phone_number.parse::<PhoneNumber>() {
        Ok(phone_number) => phone_number,
        Err(message) => {
            return Ok(html(views::phone_number_page(&form.phone_number, Some(&message))))
        }
    };

    session.contact = Some(ContactDetail::from(phone_number));
    session.phone_number_entered = Some(form.phone_number.trim().to_string());
    session.confirmation_id = None;
    see_other_with_session("/review", &session, &signing_key)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(show_channel_selection)
        .service(submit_channel_selection)
        .service(show_email)
        .service(submit_email)
        .service(show_phone_number)
        .service(submit_phone_number);
}
