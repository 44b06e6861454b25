//! Policy assignment and policy administration.

use chrono::{DateTime, Utc};

use shareguard_access::{can_manage_policies, can_write_file, can_write_folder_with_overlay};
use shareguard_audit::{AuditEvent, AuditSink, EventType, TargetRef};
use shareguard_auth::Actor;
use shareguard_core::{DomainError, DomainResult, RetentionId};
use shareguard_files::{File, Folder, FolderPermission, FolderTree};

use crate::policy::{FileRetention, RetentionPolicy};

fn ensure_same_company(actor: &Actor, policy: &RetentionPolicy) -> DomainResult<()> {
    // Policies are company-scoped data; a foreign policy id reads as missing.
    if policy.company_id != actor.company_id {
        return Err(DomainError::not_found());
    }
    Ok(())
}

/// Assign `policy` to a single file.
///
/// Allowed for policy managers or anyone with write access to the file.
/// History is preserved: this always appends a new assignment row.
pub fn assign_policy(
    actor: &Actor,
    file: &File,
    policy: &RetentionPolicy,
    sink: &dyn AuditSink,
    now: DateTime<Utc>,
) -> DomainResult<FileRetention> {
    if !actor.in_company(file.company_id) {
        return Err(DomainError::not_found());
    }
    ensure_same_company(actor, policy)?;

    if !can_manage_policies(actor) && !can_write_file(actor, file) {
        return Err(DomainError::forbidden());
    }
    if !file.deletion_status.is_active() {
        return Err(DomainError::conflict("file is not active"));
    }

    let row = FileRetention {
        id: RetentionId::new(),
        file_id: file.id,
        policy_id: policy.id,
        assigned_at: now,
        under_legal_hold: false,
    };

    sink.record(AuditEvent::new(
        file.company_id,
        Some(actor.id),
        EventType::PolicyAssign,
        Some(TargetRef::File(file.id)),
        serde_json::json!({
            "policyId": policy.id,
            "policyName": policy.name,
        }),
        now,
    ));

    Ok(row)
}

/// Assign `policy` to the files of a folder.
///
/// With `recursive`, every ACTIVE file across the whole subtree is collected
/// (iterative walk via the arena tree) before one row per file is created;
/// otherwise only direct children are touched. An empty folder assigns
/// nothing and is not an error.
pub fn assign_policy_to_folder(
    actor: &Actor,
    folder: &Folder,
    grants: &[FolderPermission],
    policy: &RetentionPolicy,
    tree: &FolderTree,
    files: &[File],
    recursive: bool,
    sink: &dyn AuditSink,
    now: DateTime<Utc>,
) -> DomainResult<Vec<FileRetention>> {
    if !actor.in_company(folder.company_id) {
        return Err(DomainError::not_found());
    }
    ensure_same_company(actor, policy)?;

    if !can_manage_policies(actor) && !can_write_folder_with_overlay(actor, folder, grants) {
        return Err(DomainError::forbidden());
    }

    let scope: Vec<_> = if recursive {
        tree.subtree(folder.id)
    } else {
        vec![folder.id]
    };

    let rows: Vec<FileRetention> = files
        .iter()
        .filter(|file| {
            file.company_id == actor.company_id
                && file.deletion_status.is_active()
                && scope.contains(&file.folder_id)
        })
        .map(|file| FileRetention {
            id: RetentionId::new(),
            file_id: file.id,
            policy_id: policy.id,
            assigned_at: now,
            under_legal_hold: false,
        })
        .collect();

    sink.record(AuditEvent::new(
        folder.company_id,
        Some(actor.id),
        EventType::PolicyAssign,
        Some(TargetRef::Folder(folder.id)),
        serde_json::json!({
            "policyId": policy.id,
            "policyName": policy.name,
            "assignedCount": rows.len(),
            "recursive": recursive,
        }),
        now,
    ));

    Ok(rows)
}

/// Delete a policy. Refused while any assignment still references it.
pub fn delete_policy(
    actor: &Actor,
    policy: &RetentionPolicy,
    reference_count: usize,
) -> DomainResult<()> {
    ensure_same_company(actor, policy)?;
    if !can_manage_policies(actor) {
        return Err(DomainError::forbidden());
    }
    if reference_count > 0 {
        return Err(DomainError::conflict(
            "policy is assigned to files; remove assignments first",
        ));
    }
    Ok(())
}

/// Place a legal hold on one assignment.
///
/// Requires policy management rights and a policy that allows holds. Any
/// held assignment exempts the file from automated erasure.
pub fn place_legal_hold(
    actor: &Actor,
    policy: &RetentionPolicy,
    retention: &FileRetention,
) -> DomainResult<FileRetention> {
    ensure_same_company(actor, policy)?;
    if !can_manage_policies(actor) {
        return Err(DomainError::forbidden());
    }
    if retention.policy_id != policy.id {
        return Err(DomainError::validation(
            "assignment does not belong to this policy",
        ));
    }
    if !policy.legal_hold_allowed {
        return Err(DomainError::conflict("policy does not allow legal holds"));
    }
    let mut updated = *retention;
    updated.under_legal_hold = true;
    Ok(updated)
}
