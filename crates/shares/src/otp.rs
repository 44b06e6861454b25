//! One-time password generation and hashing.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    rand_core::OsRng};
use rand::Rng;

use shareguard_core::{DomainError, DomainResult};

/// Digits in a generated OTP.
pub const OTP_LENGTH: u32 = 6;

/// Generate a numeric OTP with no leading zero.
pub fn generate_otp() -> String {
    let lower = 10u32.pow(OTP_LENGTH - 1);
    let upper = 10u32.pow(OTP_LENGTH);
    rand::rng().random_range(lower..upper).to_string()
}

/// Salted hash of an OTP for storage (Argon2, PHC string format).
pub fn hash_otp(otp: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(otp.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| DomainError::upstream(format!("otp hashing failed: {err}")))
}

/// Verify a presented OTP against its stored hash.
///
/// A malformed stored hash verifies as false rather than erroring; the
/// share is simply unusable.
pub fn verify_otp(stored_hash: &str, presented: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(presented.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
