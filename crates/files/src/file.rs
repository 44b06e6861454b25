use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shareguard_core::{CompanyId, DepartmentId, DomainError, DomainResult, Entity, FileId,
    FolderId, ProofId, UserId};

use crate::folder::Folder;

/// Likelihood that a file contains personal data, as classified at upload
/// time (and re-classified on demand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GdprRiskLevel {
    Unknown,
    NoPiiDetected,
    PossiblePii,
    ConfirmedPii,
}

impl GdprRiskLevel {
    /// Risk levels that block external sharing without an override.
    pub fn blocks_external_share(&self) -> bool {
        matches!(self, GdprRiskLevel::PossiblePii | GdprRiskLevel::ConfirmedPii)
    }

    /// Risk level that blocks deletion without an override.
    pub fn blocks_deletion(&self) -> bool {
        matches!(self, GdprRiskLevel::ConfirmedPii)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GdprRiskLevel::Unknown => "UNKNOWN",
            GdprRiskLevel::NoPiiDetected => "NO_PII_DETECTED",
            GdprRiskLevel::PossiblePii => "POSSIBLE_PII",
            GdprRiskLevel::ConfirmedPii => "CONFIRMED_PII",
        }
    }
}

/// Outcome of the malware scan that runs after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MalwareStatus {
    Pending,
    Clean,
    Infected,
    Failed,
}

/// Deletion lifecycle of a file.
///
/// `Erased` is terminal and reachable only through the erasure pipeline,
/// which requires an erasure proof to exist first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeletionStatus {
    Active,
    SoftDeleted,
    PendingErasure,
    Erased,
}

impl DeletionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, DeletionStatus::Active)
    }
}

/// Snapshot of a stored file.
///
/// Invariants: `company_id` always matches the owning folder's company;
/// `department_id` is inherited from the containing folder at move-time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: FileId,
    pub company_id: CompanyId,
    pub department_id: Option<DepartmentId>,
    pub folder_id: FolderId,
    pub created_by_user_id: UserId,
    pub name: String,
    /// File extension including the leading dot, when known (e.g. ".pdf").
    pub extension: Option<String>,
    /// Opaque path in the external storage backend.
    pub storage_path: String,
    pub gdpr_risk_level: GdprRiskLevel,
    pub malware_status: MalwareStatus,
    pub deletion_status: DeletionStatus,
    pub deletion_proof_id: Option<ProofId>,
    pub created_at: DateTime<Utc>,
}

impl Entity for File {
    type Id = FileId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl File {
    fn ensure_active(&self) -> DomainResult<()> {
        if !self.deletion_status.is_active() {
            return Err(DomainError::conflict("file is not active"));
        }
        Ok(())
    }

    /// Soft-delete: `Active -> SoftDeleted`.
    ///
    /// Callers run the GDPR gate first; this transition only enforces the
    /// status guard.
    pub fn soft_delete(&mut self) -> DomainResult<()> {
        self.ensure_active()?;
        self.deletion_status = DeletionStatus::SoftDeleted;
        Ok(())
    }

    /// Queue for erasure under a retention policy's auto-delete rule.
    pub fn mark_pending_erasure(&mut self) -> DomainResult<()> {
        match self.deletion_status {
            DeletionStatus::Active | DeletionStatus::SoftDeleted => {
                self.deletion_status = DeletionStatus::PendingErasure;
                Ok(())
            }
            DeletionStatus::PendingErasure | DeletionStatus::Erased => {
                Err(DomainError::conflict("file already queued or erased"))
            }
        }
    }

    /// Finalize erasure: `PendingErasure -> Erased`, linking the proof.
    ///
    /// The proof must exist before this is called; the erasure pipeline
    /// enforces that ordering.
    pub fn mark_erased(&mut self, proof_id: ProofId) -> DomainResult<()> {
        if self.deletion_status != DeletionStatus::PendingErasure {
            return Err(DomainError::conflict("file is not pending erasure"));
        }
        self.deletion_status = DeletionStatus::Erased;
        self.deletion_proof_id = Some(proof_id);
        Ok(())
    }

    /// Move into `target`, inheriting its department scope.
    pub fn move_to(&mut self, target: &Folder) -> DomainResult<()> {
        self.ensure_active()?;
        if target.company_id != self.company_id {
            // Tenant boundary: surfaced as NotFound so cross-company folder
            // ids are indistinguishable from missing ones.
            return Err(DomainError::not_found());
        }
        if target.id == self.folder_id {
            return Err(DomainError::conflict("file already in this folder"));
        }
        self.folder_id = target.id;
        self.department_id = target.department_id;
        Ok(())
    }

    /// Rename, preserving the original extension when the new name drops it.
    pub fn rename(&mut self, new_name: &str) -> DomainResult<()> {
        self.ensure_active()?;
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("file name must not be empty"));
        }
        self.name = match &self.extension {
            Some(ext) if !trimmed.to_lowercase().ends_with(&ext.to_lowercase()) => {
                format!("{trimmed}{ext}")
            }
            _ => trimmed.to_string(),
        };
        Ok(())
    }
}
