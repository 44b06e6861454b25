use serde::{Deserialize, Serialize};

use shareguard_core::{CompanyId, DepartmentId, DomainError, DomainResult, Entity, FolderId,
    UserId};

/// Snapshot of a folder.
///
/// Folders form a tree rooted at `parent_folder_id = None` per company;
/// `path` is the materialized slash-joined ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub company_id: CompanyId,
    /// `None` means company-wide scope, not "unassigned".
    pub department_id: Option<DepartmentId>,
    pub parent_folder_id: Option<FolderId>,
    pub name: String,
    pub path: String,
    pub created_by_user_id: UserId,
    pub is_department_root: bool,
    pub contains_personal_data: bool,
}

impl Entity for Folder {
    type Id = FolderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Folder {
    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    /// Materialized path for a direct child named `name`.
    pub fn child_path(&self, name: &str) -> String {
        format!("{}/{}", self.path.trim_end_matches('/'), name)
    }

    /// A folder is deletable only when it has no files and no subfolders.
    pub fn ensure_deletable(&self, file_count: usize, subfolder_count: usize) -> DomainResult<()> {
        if file_count > 0 || subfolder_count > 0 {
            return Err(DomainError::conflict(
                "folder is not empty; delete or move contents first",
            ));
        }
        Ok(())
    }
}
