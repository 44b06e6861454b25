//! Arena-backed folder tree.
//!
//! Folder rows are indexed by id in a flat map instead of nested owned
//! pointers, and traversal is an explicit worklist rather than recursion, so
//! pathologically deep trees cannot overflow the stack.

use std::collections::{HashMap, HashSet};

use shareguard_core::{CompanyId, DomainError, DomainResult, FolderId};

use crate::folder::Folder;

/// A company's folder hierarchy, loaded as one arena.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    nodes: HashMap<FolderId, Folder>,
    children: HashMap<FolderId, Vec<FolderId>>,
    roots: Vec<FolderId>,
}

impl FolderTree {
    /// Build a tree from folder snapshots belonging to `company_id`.
    ///
    /// Rows from any other company are rejected outright; the tenant filter
    /// is unconditional at this layer.
    pub fn build(
        company_id: CompanyId,
        folders: impl IntoIterator<Item = Folder>,
    ) -> DomainResult<Self> {
        let mut tree = FolderTree::default();
        for folder in folders {
            if folder.company_id != company_id {
                return Err(DomainError::validation(
                    "folder tree must not mix companies",
                ));
            }
            match folder.parent_folder_id {
                Some(parent) => tree.children.entry(parent).or_default().push(folder.id),
                None => tree.roots.push(folder.id),
            }
            tree.nodes.insert(folder.id, folder);
        }
        Ok(tree)
    }

    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: FolderId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn roots(&self) -> &[FolderId] {
        &self.roots
    }

    pub fn children_of(&self, id: FolderId) -> &[FolderId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The subtree rooted at `start`, including `start` itself.
    ///
    /// Iterative worklist walk; a visited set makes corrupt (cyclic) input
    /// terminate instead of looping.
    pub fn subtree(&self, start: FolderId) -> Vec<FolderId> {
        let mut out = Vec::new();
        if !self.nodes.contains_key(&start) {
            return out;
        }
        let mut visited: HashSet<FolderId> = HashSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            out.push(id);
            stack.extend(self.children_of(id).iter().copied());
        }
        out
    }

    /// Recompute the materialized path of `id` from its ancestor chain.
    ///
    /// Used to validate the `path` column; walks upward iteratively.
    pub fn materialized_path(&self, id: FolderId) -> Option<String> {
        let mut names = Vec::new();
        let mut cursor = self.nodes.get(&id)?;
        let mut hops = 0usize;
        loop {
            names.push(cursor.name.clone());
            match cursor.parent_folder_id {
                Some(parent) => {
                    cursor = self.nodes.get(&parent)?;
                    hops += 1;
                    if hops > self.nodes.len() {
                        // Ancestor chain longer than the arena: corrupt input.
                        return None;
                    }
                }
                None => break,
            }
        }
        names.reverse();
        Some(format!("/{}", names.join("/")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shareguard_core::UserId;

    fn folder(
        company_id: CompanyId,
        parent: Option<&Folder>,
        name: &str,
    ) -> Folder {
        let path = match parent {
            Some(p) => p.child_path(name),
            None => format!("/{name}"),
        };
        Folder {
            id: FolderId::new(),
            company_id,
            department_id: None,
            parent_folder_id: parent.map(|p| p.id),
            name: name.to_string(),
            path,
            created_by_user_id: UserId::new(),
            is_department_root: false,
            contains_personal_data: false,
        }
    }

    #[test]
    fn subtree_includes_start_and_all_descendants() {
        let company = CompanyId::new();
        let root = folder(company, None, "Files");
        let child_a = folder(company, Some(&root), "A");
        let child_b = folder(company, Some(&root), "B");
        let grandchild = folder(company, Some(&child_a), "Deep");
        let ids = [root.id, child_a.id, child_b.id, grandchild.id];

        let tree = FolderTree::build(
            company,
            vec![root, child_a, child_b, grandchild],
        )
        .unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.roots(), &[ids[0]]);
        assert!(tree.contains(ids[3]));
        assert_eq!(tree.get(ids[1]).unwrap().name, "A");

        let subtree = tree.subtree(ids[0]);
        assert_eq!(subtree.len(), 4);
        for id in ids {
            assert!(subtree.contains(&id));
        }

        let partial = tree.subtree(ids[1]);
        assert_eq!(partial.len(), 2);
        assert!(partial.contains(&ids[3]));
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let company = CompanyId::new();
        let mut folders = vec![folder(company, None, "root")];
        for i in 0..10_000 {
            let parent = folders.last().unwrap().clone();
            folders.push(folder(company, Some(&parent), &format!("d{i}")));
        }
        let root_id = folders[0].id;
        let tree = FolderTree::build(company, folders).unwrap();
        assert_eq!(tree.subtree(root_id).len(), 10_001);
    }

    #[test]
    fn foreign_company_rows_are_rejected() {
        let company = CompanyId::new();
        let foreign = folder(CompanyId::new(), None, "Other");
        let err = FolderTree::build(company, vec![foreign]).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation for mixed companies"),
        }
    }

    #[test]
    fn materialized_path_matches_stored_path() {
        let company = CompanyId::new();
        let root = folder(company, None, "Files");
        let child = folder(company, Some(&root), "Reports");
        let child_id = child.id;
        let stored = child.path.clone();

        let tree = FolderTree::build(company, vec![root, child]).unwrap();
        assert_eq!(tree.materialized_path(child_id).unwrap(), stored);
    }
}
