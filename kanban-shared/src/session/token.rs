/// Session token utilities
///
/// Tokens are what the client holds in its cookie. The service never stores
/// them: the session store is keyed by a SHA-256 digest of the token, so a
/// dump of Redis does not yield usable cookies.
///
/// # Token Format
///
/// 32 bytes from the OS RNG, hex-encoded (64 lowercase hex chars).
///
/// # Example
///
/// ```
/// use kanban_shared::session::token::{generate_token, is_well_formed, session_id_for};
///
/// let token = generate_token();
/// assert_eq!(token.len(), 64);
/// assert!(is_well_formed(&token));
///
/// // Same token = same session ID (deterministic)
/// assert_eq!(session_id_for(&token), session_id_for(&token));
/// ```

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random bytes in a token
const TOKEN_BYTES: usize = 32;

/// Length of an encoded token (hex chars)
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

/// Generates a new session token
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Derives the storage ID of a session from its token
///
/// Hex-encoded SHA-256 of the token (64 characters).
pub fn session_id_for(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks token shape without any store lookup
///
/// Tokens that fail this check can never name a session.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.bytes().all(|b| b.is_ascii_hexdigit())
}
