use actix_web::{get, web, Responder};

use super::{html, views};

#[get("/")]
async fn start() -> impl Responder {
    html(views::start_page())
}

#[get("/email-confirmation-pending")]
async fn email_confirmation_pending() -> impl Responder {
    html(views::email_confirmation_pending_page())
}

#[get("/subscription-confirmed/already")]
async fn already_subscribed() -> impl Responder {
    html(views::already_subscribed_page())
}

#[get("/unknown-test-date")]
async fn unknown_test_date() -> impl Responder {
    html(views::unknown_test_date_page())
}

#[get("/test-expired")]
async fn test_expired() -> impl Responder {
    html(views::test_expired_page())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(start)
        .service(email_confirmation_pending)
        .service(already_subscribed)
        .service(unknown_test_date)
        .service(test_expired);
}
