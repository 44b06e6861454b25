//! Folder-scoped permission overlay.
//!
//! Overlay grants extend the role/ownership defaults on exactly one folder.
//! They widen access only: evaluation is an OR over matching grants, and the
//! base predicate is always consulted first. Grant management itself is
//! bootstrapped from the base rules (`can_write_folder`), so a company can
//! never lock itself out of its own folders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shareguard_audit::{AuditEvent, AuditSink, EventType, TargetRef};
use shareguard_auth::Actor;
use shareguard_core::{DomainError, DomainResult, PermissionId};
use shareguard_files::{AccessKind, Folder, FolderPermission, PermissionSet, Subject};

use crate::predicates::can_write_folder;

/// True iff any grant on `folder` covers `actor` for `kind`.
pub fn overlay_allows(
    grants: &[FolderPermission],
    folder: &Folder,
    actor: &Actor,
    kind: AccessKind,
) -> bool {
    grants
        .iter()
        .filter(|grant| grant.folder_id == folder.id)
        .any(|grant| grant.subject.matches(actor) && grant.grants.allows(kind))
}

/// Base read OR overlay read.
pub fn can_read_folder_with_overlay(
    actor: &Actor,
    folder: &Folder,
    grants: &[FolderPermission],
) -> bool {
    crate::predicates::can_read_folder(actor, folder)
        || overlay_allows(grants, folder, actor, AccessKind::Read)
}

/// Base write OR overlay write.
pub fn can_write_folder_with_overlay(
    actor: &Actor,
    folder: &Folder,
    grants: &[FolderPermission],
) -> bool {
    can_write_folder(actor, folder) || overlay_allows(grants, folder, actor, AccessKind::Write)
}

/// Manage the overlay itself: folder write access, or an explicit
/// write/manage grant.
pub fn can_manage_permissions(
    actor: &Actor,
    folder: &Folder,
    grants: &[FolderPermission],
) -> bool {
    can_write_folder(actor, folder)
        || overlay_allows(grants, folder, actor, AccessKind::Write)
        || overlay_allows(grants, folder, actor, AccessKind::Manage)
}

/// Request to create or replace one grant.
///
/// Absent flags resolve conservatively: readable, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    pub subject: Subject,
    pub can_read: Option<bool>,
    pub can_write: Option<bool>,
    pub can_share: Option<bool>,
    pub can_manage: Option<bool>,
}

impl GrantRequest {
    fn resolve(&self) -> PermissionSet {
        PermissionSet {
            can_read: self.can_read.unwrap_or(true),
            can_write: self.can_write.unwrap_or(false),
            can_share: self.can_share.unwrap_or(false),
            can_manage: self.can_manage.unwrap_or(false),
        }
    }
}

/// Create or update the grant for `(folder, subject)`.
///
/// Flags are replaced wholesale — no partial merge. A repeated grant updates
/// the existing row in place, so at most one row exists per folder/subject.
pub fn upsert_permission(
    actor: &Actor,
    folder: &Folder,
    grants: &mut Vec<FolderPermission>,
    request: &GrantRequest,
    sink: &dyn AuditSink,
    now: DateTime<Utc>,
) -> DomainResult<FolderPermission> {
    if !actor.in_company(folder.company_id) {
        return Err(DomainError::not_found());
    }
    if !can_manage_permissions(actor, folder, grants) {
        return Err(DomainError::forbidden());
    }

    let flags = request.resolve();
    let row = match grants
        .iter_mut()
        .find(|g| g.folder_id == folder.id && g.subject == request.subject)
    {
        Some(existing) => {
            existing.grants = flags;
            *existing
        }
        None => {
            let created = FolderPermission {
                id: PermissionId::new(),
                folder_id: folder.id,
                subject: request.subject,
                grants: flags,
            };
            grants.push(created);
            created
        }
    };

    sink.record(AuditEvent::new(
        folder.company_id,
        Some(actor.id),
        EventType::PermissionGrant,
        Some(TargetRef::Folder(folder.id)),
        serde_json::json!({
            "subject": row.subject,
            "canRead": row.grants.can_read,
            "canWrite": row.grants.can_write,
            "canShare": row.grants.can_share,
            "canManage": row.grants.can_manage,
        }),
        now,
    ));

    Ok(row)
}

/// Remove a grant by id.
///
/// A missing id is a `NotFound` error, not a silent success.
pub fn remove_permission(
    actor: &Actor,
    folder: &Folder,
    grants: &mut Vec<FolderPermission>,
    permission_id: PermissionId,
    sink: &dyn AuditSink,
    now: DateTime<Utc>,
) -> DomainResult<FolderPermission> {
    if !actor.in_company(folder.company_id) {
        return Err(DomainError::not_found());
    }
    if !can_manage_permissions(actor, folder, grants) {
        return Err(DomainError::forbidden());
    }

    let index = grants
        .iter()
        .position(|g| g.id == permission_id && g.folder_id == folder.id)
        .ok_or(DomainError::NotFound)?;
    let removed = grants.remove(index);

    sink.record(AuditEvent::new(
        folder.company_id,
        Some(actor.id),
        EventType::PermissionRevoke,
        Some(TargetRef::Folder(folder.id)),
        serde_json::json!({ "subject": removed.subject }),
        now,
    ));

    Ok(removed)
}
