//! Gated lifecycle operations.
//!
//! These combine the base predicates, the overlay, the GDPR gate, status
//! guards, and audit emission in the order the gate contract requires:
//! tenant boundary, then authorization, then status, then the gate. Every
//! denial is audited, not only the successes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shareguard_access::{can_write_file, can_write_folder_with_overlay};
use shareguard_audit::{AuditEvent, AuditSink, EventType, TargetRef};
use shareguard_auth::Actor;
use shareguard_core::{DomainError, DomainResult};
use shareguard_files::{File, Folder, FolderPermission, GdprRiskLevel};

use crate::gate::{GateDecision, evaluate_file_delete, evaluate_folder_delete};

/// Caller-supplied knobs for a delete request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    /// Explicit GDPR override; only honored for override-capable roles.
    pub gdpr_override: bool,
}

/// Soft-delete a file.
///
/// Returns the updated snapshot (`SoftDeleted`) for the persistence
/// collaborator to store. The file itself is left untouched on any denial.
pub fn delete_file(
    actor: &Actor,
    file: &File,
    request: &DeleteRequest,
    sink: &dyn AuditSink,
    now: DateTime<Utc>,
) -> DomainResult<File> {
    if !actor.in_company(file.company_id) {
        return Err(DomainError::not_found());
    }

    if !can_write_file(actor, file) {
        sink.record(AuditEvent::new(
            file.company_id,
            Some(actor.id),
            EventType::FileDelete,
            Some(TargetRef::File(file.id)),
            serde_json::json!({
                "blocked": true,
                "reason": "access_denied",
                "fileName": file.name,
            }),
            now,
        ));
        return Err(DomainError::forbidden());
    }

    if !file.deletion_status.is_active() {
        return Err(DomainError::conflict("file already deleted"));
    }

    match evaluate_file_delete(actor, file, request.gdpr_override) {
        GateDecision::Blocked(blocked) => {
            sink.record(AuditEvent::new(
                file.company_id,
                Some(actor.id),
                EventType::GdprDeleteBlocked,
                Some(TargetRef::File(file.id)),
                serde_json::json!({
                    "fileName": file.name,
                    "gdprRiskLevel": blocked.trigger.as_str(),
                }),
                now,
            ));
            Err(DomainError::gdpr_blocked(blocked.message))
        }
        GateDecision::Allowed { override_used } => {
            let mut updated = file.clone();
            updated.soft_delete()?;
            sink.record(AuditEvent::new(
                file.company_id,
                Some(actor.id),
                EventType::FileDelete,
                Some(TargetRef::File(file.id)),
                serde_json::json!({
                    "fileName": file.name,
                    "overrideUsed": override_used,
                }),
                now,
            ));
            Ok(updated)
        }
    }
}

/// Delete a folder.
///
/// The caller supplies the live child counts; the folder must be empty. On
/// `Ok(())` the persistence collaborator removes the row.
pub fn delete_folder(
    actor: &Actor,
    folder: &Folder,
    grants: &[FolderPermission],
    file_count: usize,
    subfolder_count: usize,
    request: &DeleteRequest,
    sink: &dyn AuditSink,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    if !actor.in_company(folder.company_id) {
        return Err(DomainError::not_found());
    }

    if !can_write_folder_with_overlay(actor, folder, grants) {
        sink.record(AuditEvent::new(
            folder.company_id,
            Some(actor.id),
            EventType::FolderDelete,
            Some(TargetRef::Folder(folder.id)),
            serde_json::json!({
                "blocked": true,
                "reason": "access_denied",
                "name": folder.name,
            }),
            now,
        ));
        return Err(DomainError::forbidden());
    }

    match evaluate_folder_delete(actor, folder, request.gdpr_override) {
        GateDecision::Blocked(blocked) => {
            sink.record(AuditEvent::new(
                folder.company_id,
                Some(actor.id),
                EventType::GdprDeleteBlocked,
                Some(TargetRef::Folder(folder.id)),
                serde_json::json!({
                    "name": folder.name,
                    "reason": blocked.trigger.as_str(),
                }),
                now,
            ));
            Err(DomainError::gdpr_blocked(blocked.message))
        }
        GateDecision::Allowed { override_used } => {
            folder.ensure_deletable(file_count, subfolder_count)?;
            sink.record(AuditEvent::new(
                folder.company_id,
                Some(actor.id),
                EventType::FolderDelete,
                Some(TargetRef::Folder(folder.id)),
                serde_json::json!({
                    "name": folder.name,
                    "path": folder.path,
                    "overrideUsed": override_used,
                }),
                now,
            ));
            Ok(())
        }
    }
}

/// Result of a folder PII marking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPiiUpdate {
    pub folder: Folder,
    /// Files bulk-flipped to `ConfirmedPii`; empty unless `apply_to_files`.
    pub files: Vec<File>,
}

/// Mark (or unmark) a folder as containing personal data.
///
/// With `apply_to_files`, every directly-contained file is flipped to
/// `ConfirmedPii` in the same update. One-way and one-level: subfolders are
/// untouched, and files added later are not flagged automatically.
pub fn mark_folder_personal_data(
    actor: &Actor,
    folder: &Folder,
    grants: &[FolderPermission],
    files: &[File],
    contains_personal_data: bool,
    apply_to_files: bool,
) -> DomainResult<FolderPiiUpdate> {
    if !actor.in_company(folder.company_id) {
        return Err(DomainError::not_found());
    }
    if !can_write_folder_with_overlay(actor, folder, grants) {
        return Err(DomainError::forbidden());
    }

    let mut updated = folder.clone();
    updated.contains_personal_data = contains_personal_data;

    let flipped = if contains_personal_data && apply_to_files {
        files
            .iter()
            .filter(|file| file.folder_id == folder.id)
            .map(|file| {
                let mut file = file.clone();
                file.gdpr_risk_level = GdprRiskLevel::ConfirmedPii;
                file
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(FolderPiiUpdate {
        folder: updated,
        files: flipped,
    })
}
