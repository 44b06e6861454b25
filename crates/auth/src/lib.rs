//! `shareguard-auth` — identity context for authorization decisions.
//!
//! This crate is intentionally decoupled from HTTP and storage: it resolves
//! who is acting (role, company, department) into an [`Actor`] value that is
//! passed explicitly into every decision function downstream. There is no
//! ambient request context.

pub mod actor;
pub mod api_key;
pub mod claims;
pub mod role;

pub use actor::Actor;
pub use api_key::{ApiKeyContext, GeneratedApiKey, generate_api_key, hash_api_key};
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use role::Role;
