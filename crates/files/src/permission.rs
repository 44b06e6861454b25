use serde::{Deserialize, Serialize};

use shareguard_auth::{Actor, Role};
use shareguard_core::{DepartmentId, Entity, FolderId, PermissionId, UserId};

/// The action a permission check is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Read,
    Write,
    Share,
    Manage,
}

/// Who a folder grant applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "subject_type", content = "subject_id")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Subject {
    Department(DepartmentId),
    Role(Role),
    User(UserId),
}

impl Subject {
    /// True iff `actor` is covered by this subject.
    pub fn matches(&self, actor: &Actor) -> bool {
        match self {
            Subject::Department(dept) => actor.department_id == Some(*dept),
            Subject::Role(role) => actor.role == *role,
            Subject::User(user) => actor.id == *user,
        }
    }
}

/// The flags a grant carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    pub can_read: bool,
    pub can_write: bool,
    pub can_share: bool,
    pub can_manage: bool,
}

impl PermissionSet {
    /// The conservative default for a grant with no flags supplied:
    /// readable, nothing else.
    pub fn read_only() -> Self {
        Self {
            can_read: true,
            can_write: false,
            can_share: false,
            can_manage: false,
        }
    }

    pub fn allows(&self, kind: AccessKind) -> bool {
        match kind {
            AccessKind::Read => self.can_read,
            AccessKind::Write => self.can_write,
            AccessKind::Share => self.can_share,
            AccessKind::Manage => self.can_manage,
        }
    }
}

/// A folder-scoped overlay grant.
///
/// Grants widen the role/ownership defaults, never restrict them, and apply
/// to exactly one folder (no cascade to subfolders or contained files).
/// At most one grant exists per `(folder, subject)`; re-granting replaces the
/// flags wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderPermission {
    pub id: PermissionId,
    pub folder_id: FolderId,
    pub subject: Subject,
    pub grants: PermissionSet,
}

impl Entity for FolderPermission {
    type Id = PermissionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
