use std::time::Duration;

use anyhow::Context;

use reqwest::{Client, StatusCode};

use secrecy::{ExposeSecret, Secret};

use url::Url;

use crate::domain::MotIdentification;
use crate::error::{Error, Result};
use crate::model::VehicleDetails;

const API_KEY_HEADER: &str = "x-api-key";

/// Client for the MOT history vehicle lookup API
#[derive(Debug)]
pub struct VehicleDetailsClient {
    client: Client,
    api_base_url: Url,
    api_key: Secret<String>,
}

impl VehicleDetailsClient {
    pub fn new(api_base_url: Url, api_key: Secret<String>, api_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        Ok(Self {
            client,
            api_base_url,
            api_key,
        })
    }

    #[tracing::instrument(name = "Fetch vehicle by registration", skip(self))]
    pub async fn fetch_by_vrm(&self, vrm: &str) -> Result<Option<VehicleDetails>> {
        self.fetch(&["vehicles", "registration", vrm]).await
    }

    #[tracing::instrument(name = "Fetch vehicle by MOT test number", skip(self))]
    pub async fn fetch_by_mot_test_number(&self, number: &str) -> Result<Option<VehicleDetails>> {
        self.fetch(&["vehicles", "mot-test-number", number]).await
    }

    #[tracing::instrument(name = "Fetch vehicle by DVLA id", skip(self))]
    pub async fn fetch_by_dvla_id(&self, dvla_id: &str) -> Result<Option<VehicleDetails>> {
        self.fetch(&["vehicles", "dvla-id", dvla_id]).await
    }

    /// Look up by whichever identifier the subscription carries
    pub async fn fetch_by_identification(
        &self,
        id: &MotIdentification,
    ) -> Result<Option<VehicleDetails>> {
        match id {
            MotIdentification::MotTestNumber(number) => self.fetch_by_mot_test_number(number).await,
            MotIdentification::DvlaId(dvla_id) => self.fetch_by_dvla_id(dvla_id).await,
        }
    }

    async fn fetch(&self, segments: &[&str]) -> Result<Option<VehicleDetails>> {
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Vehicle API base URL cannot have a path"))?
            .pop_if_empty()
            .extend(segments);

        let res = self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await
            .map_err(Error::VehicleApiError)?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let vehicle = res
            .error_for_status()
            .map_err(Error::VehicleApiError)?
            .json()
            .await
            .map_err(Error::VehicleApiError)?;

        Ok(Some(vehicle))
    }
}
