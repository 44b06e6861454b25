use serde::{Deserialize, Serialize};

use shareguard_core::{CompanyId, DepartmentId, UserId};

use crate::Role;

/// The authenticated principal performing an action.
///
/// Ephemeral: derived per request from a session or an API key and passed by
/// value into every predicate and pipeline call. Never persisted.
///
/// `department_id: None` means the actor has **no department membership**.
/// On files/folders the same `None` means "company-wide scope" — a different
/// meaning of absence. The two are never conflated: [`Actor::in_department`]
/// only matches two present, equal department ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
    pub company_id: CompanyId,
    pub department_id: Option<DepartmentId>,
}

impl Actor {
    /// True iff the actor belongs to `company`.
    pub fn in_company(&self, company: CompanyId) -> bool {
        self.company_id == company
    }

    /// True iff the actor has a department and it equals `department`.
    ///
    /// An actor without a department matches nothing; a company-wide entity
    /// (`department = None`) is matched by nobody through this check.
    pub fn in_department(&self, department: Option<DepartmentId>) -> bool {
        match (self.department_id, department) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }

    /// True iff `user` is the actor itself.
    pub fn is_user(&self, user: UserId) -> bool {
        self.id == user
    }
}
