//! Download tokens.

use rand::{RngCore, rngs::OsRng};

/// Number of random bytes in a download token.
pub const DOWNLOAD_TOKEN_BYTES: usize = 32;

/// A fresh, unguessable, URL-safe download token.
#[must_use]
pub fn generate_download_token() -> String {
    let mut bytes = [0_u8; DOWNLOAD_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    hex::encode(bytes)
}
