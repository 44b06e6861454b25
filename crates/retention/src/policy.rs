use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shareguard_core::{CompanyId, Entity, FileId, PolicyId, ProofId, RetentionId, UserId};

/// A company's retention policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub id: PolicyId,
    pub company_id: CompanyId,
    pub name: String,
    pub description: Option<String>,
    /// `None` means "retain indefinitely".
    pub duration_days: Option<u32>,
    /// Queue files for erasure automatically once the duration lapses.
    pub auto_delete: bool,
    /// Whether assignments under this policy may carry a legal hold.
    pub legal_hold_allowed: bool,
}

impl Entity for RetentionPolicy {
    type Id = PolicyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One policy assignment on one file.
///
/// Assignments accumulate: a file keeps its historical rows when the policy
/// changes. Any row with `under_legal_hold` exempts the file from erasure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRetention {
    pub id: RetentionId,
    pub file_id: FileId,
    pub policy_id: PolicyId,
    pub assigned_at: DateTime<Utc>,
    pub under_legal_hold: bool,
}

impl Entity for FileRetention {
    type Id = RetentionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Immutable evidence that a specific file was erased.
///
/// Created exactly once per erased file, before the file's status flips to
/// `Erased`; never mutated or deleted except as part of whole-tenant
/// teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErasureProof {
    pub id: ProofId,
    pub company_id: CompanyId,
    pub file_id: FileId,
    pub policy_id: Option<PolicyId>,
    pub erased_at: DateTime<Utc>,
    pub erased_by_user_id: UserId,
    /// Deletion mechanism, e.g. "storage-delete".
    pub method: String,
    /// SHA-256 of the stored bytes immediately before deletion, hex-encoded.
    /// Absent when the content could not be fetched.
    pub hash_before_delete: Option<String>,
}

impl Entity for ErasureProof {
    type Id = ProofId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
