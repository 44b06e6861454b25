use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shareguard_core::{CompanyId, FileId, FolderId, PolicyId, ShareId, UserId};

/// Kind of audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    FileUpload,
    FileDownload,
    FileRename,
    FileMove,
    FileDelete,
    FolderDelete,
    FileShareCreate,
    GdprShareBlocked,
    GdprDeleteBlocked,
    FileErased,
    PolicyAssign,
    PermissionGrant,
    PermissionRevoke,
}

impl EventType {
    /// Stable dotted event identifier.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventType::FileUpload => "files.file.uploaded",
            EventType::FileDownload => "files.file.downloaded",
            EventType::FileRename => "files.file.renamed",
            EventType::FileMove => "files.file.moved",
            EventType::FileDelete => "files.file.deleted",
            EventType::FolderDelete => "files.folder.deleted",
            EventType::FileShareCreate => "shares.share.created",
            EventType::GdprShareBlocked => "gdpr.share.blocked",
            EventType::GdprDeleteBlocked => "gdpr.delete.blocked",
            EventType::FileErased => "retention.file.erased",
            EventType::PolicyAssign => "retention.policy.assigned",
            EventType::PermissionGrant => "access.permission.granted",
            EventType::PermissionRevoke => "access.permission.revoked",
        }
    }

    /// True for events that record a denied attempt rather than a mutation.
    pub fn is_blocked(&self) -> bool {
        matches!(self, EventType::GdprShareBlocked | EventType::GdprDeleteBlocked)
    }
}

/// Typed reference to the audited entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target_type", content = "target_id")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetRef {
    File(FileId),
    Folder(FolderId),
    Share(ShareId),
    Policy(PolicyId),
}

impl TargetRef {
    pub fn target_type(&self) -> &'static str {
        match self {
            TargetRef::File(_) => "FILE",
            TargetRef::Folder(_) => "FOLDER",
            TargetRef::Share(_) => "SHARE",
            TargetRef::Policy(_) => "POLICY",
        }
    }
}

/// One append-only audit record.
///
/// Never updated or deleted in normal operation; whole-tenant teardown is the
/// only path that removes rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub company_id: CompanyId,
    /// Absent for system-initiated actions.
    pub actor_user_id: Option<UserId>,
    pub event_type: EventType,
    pub target: Option<TargetRef>,
    pub metadata: serde_json::Value,
    /// Business time of the audited action.
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        company_id: CompanyId,
        actor_user_id: Option<UserId>,
        event_type: EventType,
        target: Option<TargetRef>,
        metadata: serde_json::Value,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            company_id,
            actor_user_id,
            event_type,
            target,
            metadata,
            occurred_at,
        }
    }
}
