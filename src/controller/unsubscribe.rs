use actix_web::{get, post, web, HttpResponse};

use crate::app::AppState;

use super::{html, views, RestError, RestResult};

const LINK_NOT_WORKING_MESSAGE: &str = "You’ve already unsubscribed or the link hasn’t worked.";

#[get("/unsubscribe/{id}")]
async fn show(state: web::Data<AppState>, path: web::Path<(String,)>) -> RestResult<HttpResponse> {
    let (id,) = path.into_inner();

    match state.unsubscribe.find(&id).await? {
        Some(subscription) => Ok(html(views::unsubscribe_page(&id, &subscription.vrm))),
        None => Err(RestError::NotFound(LINK_NOT_WORKING_MESSAGE.into())),
    }
}

#[tracing::instrument(name = "Unsubscribe by link", skip(state, path))]
#[post("/unsubscribe/{id}")]
async fn submit(state: web::Data<AppState>, path: web::Path<(String,)>) -> RestResult<HttpResponse> {
    let (id,) = path.into_inner();

    match state.unsubscribe.unsubscribe(&id).await? {
        Some(subscription) => Ok(html(views::unsubscribed_page(&subscription.vrm))),
        None => Err(RestError::NotFound(LINK_NOT_WORKING_MESSAGE.into())),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(show).service(submit);
}
