use actix_web::{get, post, web, HttpResponse};

use chrono::Utc;

use serde::Deserialize;

use crate::app::AppState;
use crate::crypto::SigningKey;
use crate::domain::{VehicleType, Vrm};
use crate::model::VehicleDetails;

use super::{html, see_other, see_other_with_session, views, MotrSession, RestResult};

const SEARCH_FAILED_MESSAGE: &str = "Something went wrong with the search. Try again later.";
const VEHICLE_NOT_FOUND_MESSAGE: &str = "We don't hold information about this vehicle.";
const TRAILER_NOT_FOUND_MESSAGE: &str = "We don't hold information about this trailer.";

#[derive(Debug, Deserialize)]
pub struct VrmForm {
    #[serde(rename = "regNumber", default)]
    reg_number: String,
    /// Hidden from people, filled in by bots
    #[serde(default)]
    honey: String,
}

#[get("/vrm")]
async fn show(session: MotrSession) -> RestResult<HttpResponse> {
    Ok(html(views::vrm_page(
        session.vrm.as_deref().unwrap_or_default(),
        None,
    )))
}

/// Where a vehicle that was found sends the user next
enum VehicleCheck {
    Accepted,
    /// An MOT vehicle without a test date cannot be reminded about
    NoUsableRecord,
    UnknownTestDate,
    TestExpired,
}

fn check_vehicle(vehicle: &VehicleDetails) -> VehicleCheck {
    match (vehicle.mot_expiry_date, vehicle.vehicle_type) {
        (None, VehicleType::Mot) => VehicleCheck::NoUsableRecord,
        (None, _) => VehicleCheck::UnknownTestDate,
        (Some(expiry), _) if expiry < Utc::now().date_naive() => VehicleCheck::TestExpired,
        (Some(_), _) => VehicleCheck::Accepted,
    }
}

fn not_found_message(vrm: &Vrm) -> &'static str {
    if vrm.is_trailer_id() {
        TRAILER_NOT_FOUND_MESSAGE
    } else {
        VEHICLE_NOT_FOUND_MESSAGE
    }
}

#[tracing::instrument(name = "Submit vehicle registration", skip(state, signing_key, session, form))]
#[post("/vrm")]
async fn submit(
    state: web::Data<AppState>,
    signing_key: web::Data<SigningKey>,
    mut session: MotrSession,
    form: web::Form<VrmForm>,
) -> RestResult<HttpResponse> {
    let form = form.into_inner();

    if !form.honey.is_empty() {
        tracing::warn!("Honeypot field filled in, ignoring submission");
        return Ok(see_other("/email-confirmation-pending"));
    }

    let vrm = match form.reg_number.parse::<Vrm>() {
        Ok(vrm) => vrm,
        Err(e) => {
            return Ok(html(views::vrm_page(&form.reg_number, Some(e.user_message()))));
        }
    };

    let vehicle = match state.vehicles.fetch_by_vrm(vrm.as_ref()).await {
        Ok(Some(vehicle)) => vehicle,
        Ok(None) => {
            return Ok(html(views::vrm_page(vrm.as_ref(), Some(not_found_message(&vrm)))));
        }
        Err(e) => {
            tracing::error!(error = %e, vrm = %vrm, "Vehicle search failed");
            return Ok(html(views::vrm_page(vrm.as_ref(), Some(SEARCH_FAILED_MESSAGE))));
        }
    };

    match check_vehicle(&vehicle) {
        VehicleCheck::NoUsableRecord => {
            return Ok(html(views::vrm_page(vrm.as_ref(), Some(not_found_message(&vrm)))));
        }
        VehicleCheck::UnknownTestDate => return Ok(see_other("/unknown-test-date")),
        VehicleCheck::TestExpired => return Ok(see_other("/test-expired")),
        VehicleCheck::Accepted => {}
    }

    session.vrm = Some(vrm.into());
    session.vehicle = Some(vehicle);

    let next = if session.visiting_from_review {
        "/review"
    } else {
        "/channel-selection"
    };
    see_other_with_session(next, &session, &signing_key)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(show).service(submit);
}
