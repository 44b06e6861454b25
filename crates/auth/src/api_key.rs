//! API-key identity: hashing, generation, and actor normalization.
//!
//! Raw keys are shown once at creation; only the SHA-256 hash and a short
//! display prefix are ever stored. Lookup and expiry checks happen in the
//! persistence layer; this module owns the deterministic parts.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use shareguard_core::{ApiKeyId, CompanyId, DepartmentId, UserId};

use crate::{Actor, Role};

const PREFIX: &str = "sgk_";
const SECRET_LEN: usize = 40;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Hash a raw API key for storage and lookup (SHA-256, hex).
pub fn hash_api_key(raw_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// A freshly generated API key.
///
/// `raw_key` must be shown once to the user; only its hash and `prefix` are
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedApiKey {
    pub raw_key: String,
    pub prefix: String,
}

/// Generate a new API key.
pub fn generate_api_key() -> GeneratedApiKey {
    let mut rng = rand::rng();
    let secret: String = (0..SECRET_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    let raw_key = format!("{PREFIX}{secret}");
    let prefix = raw_key[..PREFIX.len() + 8].to_string();
    GeneratedApiKey { raw_key, prefix }
}

/// Resolved API-key identity, produced by the persistence collaborator after
/// a hash lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyContext {
    pub api_key_id: ApiKeyId,
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub department_id: Option<DepartmentId>,
    pub role: Role,
    /// Key restricted to a single department at creation time.
    pub department_scoped: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ApiKeyContext {
    /// True iff the key has lapsed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }

    /// The acting principal this key authenticates.
    ///
    /// A department-scoped key acts as `DepartmentManager` within its
    /// department regardless of the owning user's wider role.
    pub fn actor(&self) -> Actor {
        let role = if self.department_scoped {
            Role::DepartmentManager
        } else {
            self.role
        };
        Actor {
            id: self.user_id,
            role,
            company_id: self.company_id,
            department_id: self.department_id,
        }
    }
}
