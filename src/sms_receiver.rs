mod message;
mod processor;

pub use message::*;
pub use processor::*;
