use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use aws_config::{BehaviorVersion, Region, SdkConfig};

use config::{Config, Environment, File};

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use url::Url;

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper, shared by every binary
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub aws: AwsSettings,
    pub database: DatabaseSettings,
    pub queue: QueueSettings,
    pub notify: NotifySettings,
    pub vehicle_api: VehicleApiSettings,
    pub notifier: NotifierSettings,
    pub sms_receiver: SmsReceiverSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        // Get the path to the settings directory
        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }
    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            // Include the base settings
            .add_source(File::from(base_path.join("base")).required(true))
            // Include the runtime settings
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // Override/include any settings from environment variables
            // NOTE: Should be used for any prod secrets. Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }

    /// Tracing filter, `RUST_LOG` wins over the configured level
    pub fn log_filter(&self) -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| self.app.log_level.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    /// Public URL of the web app, used to build links sent to subscribers
    pub base_url: Url,
    secret_key: Secret<String>,
    #[serde(default = "default_log_level")]
    log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
    /// The session signing key
    pub fn secret_key(&self) -> &Secret<String> {
        &self.secret_key
    }
}

#[derive(Debug, Deserialize)]
pub struct AwsSettings {
    region: String,
    /// Override for local DynamoDB/SQS emulators
    #[serde(default)]
    endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Shared SDK config; credentials come from the default provider chain
    pub async fn sdk_config(&self) -> SdkConfig {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region.clone()));
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        loader.load().await
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    pub subscription_table: String,
    pub pending_subscription_table: String,
    pub cancelled_subscription_table: String,
}

#[derive(Debug, Deserialize)]
pub struct QueueSettings {
    pub url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub wait_time_seconds: i32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub visibility_timeout_seconds: i32,
}

#[derive(Debug, Deserialize)]
pub struct NotifySettings {
    pub api_base_url: Url,
    api_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
    pub templates: TemplateSettings,
}

impl NotifySettings {
    /// The Notify REST API timeout duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    /// The Notify API key, `<key name>-<service id>-<secret>`
    pub fn api_key(&self) -> &Secret<String> {
        &self.api_key
    }
}

/// Notify template ids for every message the service sends
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSettings {
    pub email_confirmation: String,
    pub sms_confirmation_code: String,
    pub sms_unsubscription_confirmation: String,
    pub email_reminders: ReminderTemplates,
    pub sms_reminders: ReminderTemplates,
}

/// One template id per reminder tier
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderTemplates {
    pub one_month: String,
    pub two_weeks: String,
    pub one_day_after: String,
    pub one_month_hgv_psv: String,
    pub two_months_hgv_psv: String,
}

#[derive(Debug, Deserialize)]
pub struct VehicleApiSettings {
    pub api_base_url: Url,
    api_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    api_timeout_milliseconds: u64,
}

impl VehicleApiSettings {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    pub fn api_key(&self) -> &Secret<String> {
        &self.api_key
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifierSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub worker_count: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    run_budget_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    remaining_time_threshold_seconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    post_processing_delay_milliseconds: u64,
}

impl NotifierSettings {
    pub fn new(
        worker_count: usize,
        run_budget: Duration,
        remaining_time_threshold: Duration,
        post_processing_delay: Duration,
    ) -> Self {
        Self {
            worker_count,
            run_budget_seconds: run_budget.as_secs(),
            remaining_time_threshold_seconds: remaining_time_threshold.as_secs(),
            post_processing_delay_milliseconds: post_processing_delay.as_millis() as u64,
        }
    }
    /// Total time a notifier run may take
    pub fn run_budget(&self) -> Duration {
        Duration::from_secs(self.run_budget_seconds)
    }
    /// Stop pulling new messages once less than this much of the budget remains
    pub fn remaining_time_threshold(&self) -> Duration {
        Duration::from_secs(self.remaining_time_threshold_seconds)
    }
    /// Grace period for in-flight reminders after pulling stops
    pub fn post_processing_delay(&self) -> Duration {
        Duration::from_millis(self.post_processing_delay_milliseconds)
    }
}

#[derive(Debug, Deserialize)]
pub struct SmsReceiverSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    bearer_token: Secret<String>,
}

impl SmsReceiverSettings {
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
    /// Token the inbound SMS callback must present
    pub fn bearer_token(&self) -> &Secret<String> {
        &self.bearer_token
    }
}
