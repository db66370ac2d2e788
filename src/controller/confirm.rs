use actix_web::http::header::ContentType;
use actix_web::{get, post, web, HttpResponse};

use serde::Deserialize;

use crate::app::AppState;
use crate::domain::ConfirmationCode;
use crate::subscription::{CodeResend, CodeVerification};

use super::{html, see_other, views, MotrSession, RestResult};

const INVALID_CODE_MESSAGE: &str = "The code is not valid";
const TOO_MANY_ATTEMPTS_MESSAGE: &str = "You’ve entered an incorrect code 3 times";
const RESEND_LIMITED_MESSAGE: &str = "You’ve already requested a new code";

#[derive(Debug, Deserialize)]
pub struct ConfirmationCodeForm {
    #[serde(rename = "confirmationCode", default)]
    confirmation_code: String,
}

/// Promote the pending subscription behind an emailed (or texted) link
#[tracing::instrument(name = "Confirm subscription link", skip(state, path))]
#[get("/confirm-subscription/{confirmation_id}")]
async fn confirm_subscription(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> RestResult<HttpResponse> {
    let (confirmation_id,) = path.into_inner();

    let subscription = state.confirmations.confirm(&confirmation_id).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .cookie(MotrSession::removal_cookie())
        .body(views::subscription_confirmed_page(
            subscription.vehicle_type,
            &subscription.contact,
        )))
}

fn phone_number_entered(session: &MotrSession) -> &str {
    session
        .phone_number_entered
        .as_deref()
        .or(session.contact.as_ref().map(|contact| contact.value.as_str()))
        .unwrap_or_default()
}

#[get("/confirm-phone")]
async fn show_confirm_phone(session: MotrSession) -> RestResult<HttpResponse> {
    if !session.is_allowed_on_confirm_phone() {
        return Ok(see_other("/"));
    }
    Ok(html(views::confirm_phone_page(phone_number_entered(&session), None)))
}

#[tracing::instrument(name = "Submit confirmation code", skip(state, session, form))]
#[post("/confirm-phone")]
async fn submit_confirm_phone(
    state: web::Data<AppState>,
    session: MotrSession,
    form: web::Form<ConfirmationCodeForm>,
) -> RestResult<HttpResponse> {
    let Some(confirmation_id) = session
        .confirmation_id
        .as_deref()
        .filter(|_| session.is_allowed_on_confirm_phone())
    else {
        return Ok(see_other("/"));
    };
    let phone_number = phone_number_entered(&session);

    let code = match form.confirmation_code.parse::<ConfirmationCode>() {
        Ok(code) => code,
        Err(message) => return Ok(html(views::confirm_phone_page(phone_number, Some(&message)))),
    };

    match state.sms_confirmations.verify(confirmation_id, &code).await? {
        CodeVerification::Valid => Ok(see_other(&format!("/confirm-subscription/{}", confirmation_id))),
        CodeVerification::Invalid => Ok(html(views::confirm_phone_page(
            phone_number,
            Some(INVALID_CODE_MESSAGE),
        ))),
        CodeVerification::MaxAttemptsReached => Ok(html(views::confirm_phone_page(
            phone_number,
            Some(TOO_MANY_ATTEMPTS_MESSAGE),
        ))),
    }
}

#[tracing::instrument(name = "Resend confirmation code", skip(state, session))]
#[get("/confirm-phone/resend")]
async fn resend_code(state: web::Data<AppState>, session: MotrSession) -> RestResult<HttpResponse> {
    let Some(confirmation_id) = session
        .confirmation_id
        .as_deref()
        .filter(|_| session.is_allowed_on_confirm_phone())
    else {
        return Ok(see_other("/"));
    };

    match state.sms_confirmations.resend(confirmation_id).await? {
        CodeResend::Sent => Ok(see_other("/confirm-phone")),
        CodeResend::Limited => Ok(html(views::confirm_phone_page(
            phone_number_entered(&session),
            Some(RESEND_LIMITED_MESSAGE),
        ))),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(confirm_subscription)
        .service(show_confirm_phone)
        .service(submit_confirm_phone)
        .service(resend_code);
}
