// src/common/id_generator.rs
//! Random identifiers for auth records and session tokens
//!
//! Record ids are 32 characters drawn from `[A-Za-z0-9]`, the shape the auth
//! tables were designed around. Session tokens carry 256 bits of entropy and
//! are base64url encoded so they can travel in cookies unescaped.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::{Rng, RngCore};

const ID_ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated record ids
pub const ID_LENGTH: usize = 32;

/// Number of random bytes behind a session token
const TOKEN_BYTES: usize = 32;

fn generate_alphanumeric(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Generate a record id for the `user`, `session`, `account` or `verification` tables
pub fn generate_id() -> String {
    generate_alphanumeric(ID_LENGTH)
}

/// Generate an opaque session token
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
