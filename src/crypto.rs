mod random;
mod signing_key;
mod token;

pub use random::*;
pub use signing_key::*;
pub use token::{SignedToken, TokenError, TokenResult};
