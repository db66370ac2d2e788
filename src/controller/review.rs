use actix_web::{get, post, web, HttpResponse};

use crate::app::AppState;
use crate::crypto::SigningKey;
use crate::subscription::PendingSubscriptionOutcome;

use super::views::{self, ReviewDetails};
use super::{see_other, see_other_with_session, MotrSession, RestResult};

#[get("/review")]
async fn show(
    signing_key: web::Data<SigningKey>,
    mut session: MotrSession,
) -> RestResult<HttpResponse> {
    let (Some(vrm), Some(vehicle), Some(contact)) = (&session.vrm, &session.vehicle, &session.contact)
    else {
        return Ok(see_other("/vrm"));
    };

    let contact_as_entered = session
        .phone_number_entered
        .as_deref()
        .filter(|_| contact.is_mobile())
        .unwrap_or(contact.value.as_str());
    let page = views::review_page(&ReviewDetails {
        vehicle: &vehicle.display_name(vrm),
        colour: vehicle.primary_colour.as_deref(),
        expiry_date: vehicle.mot_expiry_date,
        contact,
        contact_as_entered,
    });

    // Changing an answer from here comes straight back
    session.visiting_from_review = true;
    let cookie = session.cookie(&signing_key)?;

    Ok(HttpResponse::Ok()
        .content_type(actix_web::http::header::ContentType::html())
        .cookie(cookie)
        .body(page))
}

#[tracing::instrument(name = "Submit review", skip(state, signing_key, session))]
#[post("/review")]
async fn submit(
    state: web::Data<AppState>,
    signing_key: web::Data<SigningKey>,
    mut session: MotrSession,
) -> RestResult<HttpResponse> {
    if !session.is_allowed_on_review() {
        return Ok(see_other("/"));
    }
    let (Some(vrm), Some(contact)) = (session.vrm.clone(), session.contact.clone()) else {
        return Ok(see_other("/"));
    };

    match state.pending_subscriptions.create(&vrm, &contact).await? {
        PendingSubscriptionOutcome::AlreadySubscribed => Ok(see_other("/subscription-confirmed/already")),
        PendingSubscriptionOutcome::EmailConfirmationSent => Ok(see_other("/email-confirmation-pending")),
        PendingSubscriptionOutcome::SmsCodeSent { confirmation_id } => {
            session.confirmation_id = Some(confirmation_id);
            see_other_with_session("/confirm-phone", &session, &signing_key)
        }
        // The resend page tells the subscriber no further codes will be sent
        PendingSubscriptionOutcome::SmsCodeLimited { confirmation_id } => {
            session.confirmation_id = Some(confirmation_id);
            see_other_with_session("/confirm-phone/resend", &session, &signing_key)
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(show).service(submit);
}
