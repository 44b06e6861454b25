//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, denials, conflicts). Infrastructure concerns belong elsewhere.
///
/// Predicate and gate functions do not raise these for ordinary denial paths;
/// callers translate a `false` decision into `Forbidden`/`NotFound` themselves.
/// `NotFound` covers both "missing" and "wrong tenant" so that existence is
/// never leaked across company boundaries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found, or belongs to another company.
    #[error("not found")]
    NotFound,

    /// The actor is not allowed to perform this action.
    #[error("forbidden")]
    Forbidden,

    /// A protected action on PII-flagged content was blocked by the GDPR gate.
    #[error("{0}")]
    GdprBlocked(String),

    /// A conflict occurred (e.g. non-empty folder, referenced policy, or an
    /// entity already in a terminal deletion state).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An external collaborator failed (e.g. storage deletion during erasure).
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn forbidden() -> Self {
        Self::Forbidden
    }

    pub fn gdpr_blocked(msg: impl Into<String>) -> Self {
        Self::GdprBlocked(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }
}
