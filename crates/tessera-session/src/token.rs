//! Session token generation.

use base64::{Engine, engine::general_purpose::URL_SAFE};
use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::{Error, Result};

/// Random bytes behind every token.
const TOKEN_BYTES: usize = 32;

/// Generate a fresh session token.
///
/// 32 bytes from the operating system's secure random source, encoded with
/// the padded URL-safe base64 alphabet. Fails instead of returning an empty
/// token when the random source is unavailable.
pub fn generate_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| Error::TokenGeneration(e.to_string()))?;
    Ok(URL_SAFE.encode(bytes))
}
