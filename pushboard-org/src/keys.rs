//! Random credential generation
//!
//! API keys, secrets and upload prefixes are drawn from an alphabet without
//! look-alike characters (`0`/`O`/`o`, `1`/`l`/`I`).

use rand::Rng;

/// Length of generated API keys and secrets.
pub const API_KEY_LENGTH: usize = 20;

/// Characters used for generated keys.
pub const UNAMBIGUOUS_ALPHABET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789";

/// Generate a random key of `length` characters from [`UNAMBIGUOUS_ALPHABET`].
///
/// # Examples
///
/// ```
/// use pushboard_org::keys::{generate_key, API_KEY_LENGTH};
///
/// let key = generate_key(API_KEY_LENGTH);
/// assert_eq!(key.len(), API_KEY_LENGTH);
/// ```
pub fn generate_key(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| UNAMBIGUOUS_ALPHABET[rng.gen_range(0..UNAMBIGUOUS_ALPHABET.len())] as char)
        .collect()
}
