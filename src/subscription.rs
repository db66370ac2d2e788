mod confirmation;
mod pending;
mod sms_confirmation;
mod unsubscribe;

pub use confirmation::*;
pub use pending::*;
pub use sms_confirmation::*;
pub use unsubscribe::*;
