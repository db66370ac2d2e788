use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;

use chrono::Utc;

use hmac::{Hmac, Mac};

use jwt::header::HeaderType;
use jwt::{AlgorithmType, Header, SignWithKey, Token};

use reqwest::Client;

use secrecy::{ExposeSecret, Secret};

use serde::Serialize;

use sha2::Sha256;

use url::Url;

use crate::error::{Error, Result};

/// Template personalisation values, keyed by placeholder name
pub type Personalisation = BTreeMap<&'static str, String>;

// `<key name>-<service id>-<secret>`, where both ids are 36 character UUIDs
const UUID_LEN: usize = 36;

/// A Notify API key split into the parts used to sign request tokens
#[derive(Debug, Clone)]
pub struct NotifyApiKey {
    service_id: String,
    secret: Secret<String>,
}

impl NotifyApiKey {
    pub fn parse(key: &Secret<String>) -> anyhow::Result<Self> {
        let key = key.expose_secret();
        if key.len() < 2 * UUID_LEN + 2 || !key.is_ascii() {
            anyhow::bail!("Notify API key is malformed");
        }

        let secret = &key[key.len() - UUID_LEN..];
        let service_id = &key[key.len() - 2 * UUID_LEN - 1..key.len() - UUID_LEN - 1];

        Ok(Self {
            service_id: service_id.to_string(),
            secret: Secret::new(secret.to_string()),
        })
    }

    /// A short-lived HS256 token identifying the service
    fn bearer_token(&self) -> anyhow::Result<String> {
        let key: Hmac<Sha256> = Hmac::new_from_slice(self.secret.expose_secret().as_bytes())
            .context("Failed to create token signing key")?;

        let header = Header {
            algorithm: AlgorithmType::Hs256,
            type_: Some(HeaderType::JsonWebToken),
            ..Default::default()
        };
        let mut claims: BTreeMap<&str, serde_json::Value> = BTreeMap::new();
        claims.insert("iss", self.service_id.clone().into());
        claims.insert("iat", Utc::now().timestamp().into());

        let token = Token::new(header, claims)
            .sign_with_key(&key)
            .context("Failed to sign Notify token")?;

        Ok(token.as_str().to_string())
    }
}

/// Client for the GOV.UK Notify REST API
#[derive(Debug)]
pub struct NotifyClient {
    client: Client,
    email_url: Url,
    sms_url: Url,
    api_key: NotifyApiKey,
}

impl NotifyClient {
    pub fn new(api_base_url: Url, api_key: NotifyApiKey, api_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let email_url = api_base_url
            .join("v2/notifications/email")
            .context("Failed to create send email endpoint URL")?;
        let sms_url = api_base_url
            .join("v2/notifications/sms")
            .context("Failed to create send sms endpoint URL")?;

        Ok(Self {
            client,
            email_url,
            sms_url,
            api_key,
        })
    }

    #[tracing::instrument(name = "Send email through Notify", skip(self, email_address, personalisation))]
    pub async fn send_email(
        &self,
        email_address: &str,
        template_id: &str,
        personalisation: &Personalisation,
        reference: &str,
    ) -> Result<()> {
        let body = SendEmailRequest {
            email_address,
            template_id,
            personalisation,
            reference,
        };

        self.post(self.email_url.clone(), &body).await
    }

    #[tracing::instrument(name = "Send sms through Notify", skip(self, phone_number, personalisation))]
    pub async fn send_sms(
        &self,
        phone_number: &str,
        template_id: &str,
        personalisation: &Personalisation,
        reference: &str,
    ) -> Result<()> {
        let body = SendSmsRequest {
            phone_number,
            template_id,
            personalisation,
            reference,
        };

        self.post(self.sms_url.clone(), &body).await
    }

    async fn post<B: Serialize>(&self, url: Url, body: &B) -> Result<()> {
        let token = self.api_key.bearer_token()?;

        self.client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(Error::NotifyError)?;

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    email_address: &'a str,
    template_id: &'a str,
    personalisation: &'a Personalisation,
    reference: &'a str,
}

#[derive(Debug, Serialize)]
struct SendSmsRequest<'a> {
    phone_number: &'a str,
    template_id: &'a str,
    personalisation: &'a Personalisation,
    reference: &'a str,
}
