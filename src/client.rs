mod notify_client;
mod vehicle_details_client;

pub use notify_client::*;
pub use vehicle_details_client::*;
