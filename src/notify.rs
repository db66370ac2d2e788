pub mod personalisation;
mod service;
mod tier;

pub use service::*;
pub use tier::*;
