mod confirmation_code;
mod contact;
mod email_address;
mod mot_identification;
mod phone_number;
mod vehicle_type;
mod vrm;

pub use confirmation_code::*;
pub use contact::*;
pub use email_address::*;
pub use mot_identification::*;
pub use phone_number::*;
pub use vehicle_type::*;
pub use vrm::*;
