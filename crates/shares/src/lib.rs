//! `shareguard-shares` — external OTP-gated file shares.
//!
//! A share hands a file to someone outside the platform behind a one-time
//! password: the recipient proves the OTP, then downloads within the expiry
//! window and download budget. Share creation runs through the GDPR
//! external-share gate. Only the OTP's salted hash is ever stored.

pub mod create;
pub mod otp;
pub mod share;

pub use create::{CreateShareRequest, CreatedShare, create_share};
pub use otp::{generate_otp, hash_otp, verify_otp};
pub use share::{FileShare, ShareAccessState, ShareType};
