/// HTTP servers for the web app and the SMS webhook
pub mod app;
/// REST clients for outside services
pub mod client;
/// Controllers for web endpoints
pub mod controller;
/// Cryptography-related objects
pub mod crypto;
/// Domain objects
pub mod domain;
/// Library error type
pub mod error;
/// Subscription loader job
pub mod loader;
/// Stored and transferred records
pub mod model;
/// Queue unloader job
pub mod notifier;
/// Reminder tiers, personalisation and sending
pub mod notify;
/// Queue of subscriptions due for a reminder
pub mod queue;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Inbound SMS unsubscribe requests
pub mod sms_receiver;
/// Subscription lifecycle services
pub mod subscription;
/// Application telemetry for tracing and logging
pub mod telemetry;

#[cfg(test)]
mod testing;
