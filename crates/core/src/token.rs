//! Job token generation and expiry helpers.
//!
//! A token is the only handle a customer holds for their job: it is embedded
//! in the QR code and presented at the kiosk.

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::types::Timestamp;

/// Number of characters in a generated token (~131 bits of entropy).
pub const TOKEN_LEN: usize = 22;

/// Default token lifetime (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 3600;

/// Generate a random alphanumeric job token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Whether `candidate` has the shape of a generated token.
///
/// The scanner uses this to skip QR codes that were not issued by us.
pub fn is_well_formed(candidate: &str) -> bool {
    candidate.len() == TOKEN_LEN && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Expiry instant for a token created at `created_at`.
pub fn expires_at(created_at: Timestamp, ttl_secs: i64) -> Timestamp {
    created_at + chrono::Duration::seconds(ttl_secs)
}

/// Whether a token with the given expiry is no longer valid at `now`.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    now > expires_at
}
