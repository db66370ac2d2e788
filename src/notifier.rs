mod processor;
mod report;
mod unloader;

pub use processor::*;
pub use report::*;
pub use unloader::*;
