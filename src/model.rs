mod queue_item;
mod subscription;
mod vehicle_details;

pub use queue_item::*;
pub use subscription::*;
pub use vehicle_details::*;
