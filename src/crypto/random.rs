use base64::Engine as _;

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use crate::domain::CODE_LEN;

use super::token::BASE64_ENGINE;

const ID_BYTES: usize = 16;

/// A random URL-safe identifier, used for confirmation and unsubscribe links
pub fn generate_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    OsRng.fill_bytes(&mut bytes);

    BASE64_ENGINE.encode(bytes)
}

/// A random numeric code texted to confirm a phone number
pub fn generate_confirmation_code() -> String {
    let mut rng = OsRng;

    (0..CODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
