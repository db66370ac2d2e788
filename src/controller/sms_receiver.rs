use actix_web::http::header::{self, HeaderMap};
use actix_web::{post, web, HttpRequest, HttpResponse};

use anyhow::Context;

use secrecy::{ExposeSecret, Secret};

use crate::sms_receiver::{InboundSms, SmsMessageProcessor};

use super::{RestError, RestResult};

const BEARER_AUTH_PREFIX: &str = "Bearer ";

/// The token Notify is configured to send with inbound SMS callbacks
#[derive(Debug, Clone)]
pub struct CallbackToken(pub Secret<String>);

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> anyhow::Result<&str> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .context("Missing authorization in header")?
        .to_str()?;

    header_value
        .strip_prefix(BEARER_AUTH_PREFIX)
        .map(str::trim)
        .context("Authorization scheme not bearer")
}

fn authorize(req: &HttpRequest, expected: &CallbackToken) -> RestResult<()> {
    let token = bearer_token(req.headers()).map_err(|e| RestError::Unauthorized(e.to_string()))?;

    if token == expected.0.expose_secret() {
        Ok(())
    } else {
        Err(RestError::Unauthorized("Bearer token does not match".into()))
    }
}

/// Inbound SMS callback. Anything past authentication answers 200 so Notify does not retry.
#[tracing::instrument(name = "Receive inbound sms", skip(req, processor, token, body))]
#[post("/sms-receiver")]
async fn receive(
    req: HttpRequest,
    processor: web::Data<SmsMessageProcessor>,
    token: web::Data<CallbackToken>,
    body: web::Bytes,
) -> RestResult<HttpResponse> {
    if let Err(e) = authorize(&req, &token) {
        tracing::warn!(error = %e, "Inbound sms rejected");
        return Ok(HttpResponse::Unauthorized().finish());
    }

    match serde_json::from_slice::<InboundSms>(&body) {
        Ok(sms) => {
            if let Err(e) = processor.process(&sms).await {
                tracing::error!(error = %e, "Failed to process inbound sms");
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to parse inbound sms"),
    }

    Ok(HttpResponse::Ok().finish())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(receive);
}
