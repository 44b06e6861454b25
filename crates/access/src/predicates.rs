//! Role/ownership base predicates.
//!
//! Every function here is total and never panics: any mismatch, including a
//! cross-company actor, evaluates to `false`. Callers translate `false` into
//! a 403-style denial; "entity not found or cross-tenant" becomes a 404-style
//! denial *before* the predicate is ever called, so existence never leaks
//! across tenants.
//!
//! The company check comes first in every predicate and is not bypassable by
//! any role.

use serde::{Deserialize, Serialize};

use shareguard_auth::{Actor, Role};
use shareguard_files::{File, Folder};

/// Read a file: admins, DPO, and auditors company-wide; managers within
/// their department; employees for their own files or department files.
pub fn can_read_file(actor: &Actor, file: &File) -> bool {
    if !actor.in_company(file.company_id) {
        return false;
    }
    match actor.role {
        Role::SuperAdmin | Role::CompanyAdmin | Role::Dpo | Role::Auditor => true,
        Role::DepartmentManager => actor.in_department(file.department_id),
        Role::Employee => {
            actor.is_user(file.created_by_user_id) || actor.in_department(file.department_id)
        }
    }
}

/// Write a file: requires read. Employees write only what they created —
/// ownership, not department membership, gates employee writes.
pub fn can_write_file(actor: &Actor, file: &File) -> bool {
    if !can_read_file(actor, file) {
        return false;
    }
    match actor.role {
        Role::SuperAdmin | Role::CompanyAdmin => true,
        Role::Dpo | Role::Auditor => false,
        Role::DepartmentManager => actor.in_department(file.department_id),
        Role::Employee => actor.is_user(file.created_by_user_id),
    }
}

/// Share a file: like writing, with DPO added to the unconditional set
/// (DPO can share for compliance review).
pub fn can_share_file(actor: &Actor, file: &File) -> bool {
    if !can_read_file(actor, file) {
        return false;
    }
    match actor.role {
        Role::SuperAdmin | Role::CompanyAdmin | Role::Dpo => true,
        Role::Auditor => false,
        Role::DepartmentManager => actor.in_department(file.department_id),
        Role::Employee => actor.is_user(file.created_by_user_id),
    }
}

/// Read a folder: same shape as [`can_read_file`].
pub fn can_read_folder(actor: &Actor, folder: &Folder) -> bool {
    if !actor.in_company(folder.company_id) {
        return false;
    }
    match actor.role {
        Role::SuperAdmin | Role::CompanyAdmin | Role::Dpo | Role::Auditor => true,
        Role::DepartmentManager => actor.in_department(folder.department_id),
        Role::Employee => {
            actor.is_user(folder.created_by_user_id) || actor.in_department(folder.department_id)
        }
    }
}

/// Write a folder: same shape as [`can_write_file`].
pub fn can_write_folder(actor: &Actor, folder: &Folder) -> bool {
    if !can_read_folder(actor, folder) {
        return false;
    }
    match actor.role {
        Role::SuperAdmin | Role::CompanyAdmin => true,
        Role::Dpo | Role::Auditor => false,
        Role::DepartmentManager => actor.in_department(folder.department_id),
        Role::Employee => actor.is_user(folder.created_by_user_id),
    }
}

/// Manage retention policies: admins and the DPO.
pub fn can_manage_policies(actor: &Actor) -> bool {
    matches!(
        actor.role,
        Role::SuperAdmin | Role::CompanyAdmin | Role::Dpo
    )
}

/// Scope of an audit-log query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditScope {
    Department,
    Company,
    All,
}

/// View audit logs at a given scope.
///
/// Cross-tenant (`All`) visibility is reserved for SUPER_ADMIN; everyone else
/// tops out at their own company.
pub fn can_view_audit(actor: &Actor, scope: AuditScope) -> bool {
    match actor.role {
        Role::SuperAdmin => true,
        Role::CompanyAdmin | Role::Dpo | Role::Auditor => scope != AuditScope::All,
        Role::DepartmentManager => {
            matches!(scope, AuditScope::Department | AuditScope::Company)
        }
        Role::Employee => scope == AuditScope::Department,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use shareguard_core::{CompanyId, DepartmentId, FileId, FolderId, UserId};
    use shareguard_files::{DeletionStatus, GdprRiskLevel, MalwareStatus};

    fn actor(role: Role, company_id: CompanyId, department_id: Option<DepartmentId>) -> Actor {
        Actor {
            id: UserId::new(),
            role,
            company_id,
            department_id,
        }
    }

    fn file_in(company_id: CompanyId, department_id: Option<DepartmentId>) -> File {
        File {
            id: FileId::new(),
            company_id,
            department_id,
            folder_id: FolderId::new(),
            created_by_user_id: UserId::new(),
            name: "contract.pdf".to_string(),
            extension: Some(".pdf".to_string()),
            storage_path: "x/contract.pdf".to_string(),
            gdpr_risk_level: GdprRiskLevel::Unknown,
            malware_status: MalwareStatus::Clean,
            deletion_status: DeletionStatus::Active,
            deletion_proof_id: None,
            created_at: Utc::now(),
        }
    }

    fn folder_in(company_id: CompanyId, department_id: Option<DepartmentId>) -> Folder {
        Folder {
            id: FolderId::new(),
            company_id,
            department_id,
            parent_folder_id: None,
            name: "Files".to_string(),
            path: "/Files".to_string(),
            created_by_user_id: UserId::new(),
            is_department_root: false,
            contains_personal_data: false,
        }
    }

    #[test]
    fn department_manager_reads_and_writes_department_files() {
        let company = CompanyId::new();
        let dept = DepartmentId::new();
        let manager = actor(Role::DepartmentManager, company, Some(dept));
        let file = file_in(company, Some(dept));

        // Regardless of creator.
        assert!(can_read_file(&manager, &file));
        assert!(can_write_file(&manager, &file));
        assert!(can_share_file(&manager, &file));
    }

    #[test]
    fn department_manager_is_scoped_to_their_department() {
        let company = CompanyId::new();
        let manager = actor(Role::DepartmentManager, company, Some(DepartmentId::new()));
        let file = file_in(company, Some(DepartmentId::new()));

        assert!(!can_read_file(&manager, &file));
        assert!(!can_write_file(&manager, &file));
    }

    #[test]
    fn employee_reads_department_files_but_writes_only_own() {
        let company = CompanyId::new();
        let dept = DepartmentId::new();
        let employee = actor(Role::Employee, company, Some(dept));
        let file = file_in(company, Some(dept));

        // Department match grants read; the creator is someone else, so no
        // write and no share.
        assert!(can_read_file(&employee, &file));
        assert!(!can_write_file(&employee, &file));
        assert!(!can_share_file(&employee, &file));
    }

    #[test]
    fn employee_owns_their_files_even_outside_a_department() {
        let company = CompanyId::new();
        let employee = actor(Role::Employee, company, None);
        let mut file = file_in(company, Some(DepartmentId::new()));
        file.created_by_user_id = employee.id;

        assert!(can_read_file(&employee, &file));
        assert!(can_write_file(&employee, &file));
        assert!(can_share_file(&employee, &file));
    }

    #[test]
    fn employee_outside_department_and_not_creator_reads_nothing() {
        let company = CompanyId::new();
        let employee = actor(Role::Employee, company, Some(DepartmentId::new()));
        let file = file_in(company, Some(DepartmentId::new()));

        assert!(!can_read_file(&employee, &file));
    }

    #[test]
    fn dpo_and_auditor_read_company_wide_but_do_not_write() {
        let company = CompanyId::new();
        let file = file_in(company, Some(DepartmentId::new()));

        for role in [Role::Dpo, Role::Auditor] {
            let a = actor(role, company, None);
            assert!(can_read_file(&a, &file), "{role} should read");
            assert!(!can_write_file(&a, &file), "{role} should not write");
        }

        // DPO shares for compliance review; auditors do not.
        assert!(can_share_file(&actor(Role::Dpo, company, None), &file));
        assert!(!can_share_file(&actor(Role::Auditor, company, None), &file));
    }

    #[test]
    fn folder_predicates_mirror_file_predicates() {
        let company = CompanyId::new();
        let dept = DepartmentId::new();
        let folder = folder_in(company, Some(dept));

        let manager = actor(Role::DepartmentManager, company, Some(dept));
        assert!(can_read_folder(&manager, &folder));
        assert!(can_write_folder(&manager, &folder));

        let auditor = actor(Role::Auditor, company, None);
        assert!(can_read_folder(&auditor, &folder));
        assert!(!can_write_folder(&auditor, &folder));
    }

    #[test]
    fn policy_management_is_admin_and_dpo_only() {
        let company = CompanyId::new();
        assert!(can_manage_policies(&actor(Role::SuperAdmin, company, None)));
        assert!(can_manage_policies(&actor(Role::CompanyAdmin, company, None)));
        assert!(can_manage_policies(&actor(Role::Dpo, company, None)));
        assert!(!can_manage_policies(&actor(Role::Auditor, company, None)));
        assert!(!can_manage_policies(&actor(Role::DepartmentManager, company, None)));
        assert!(!can_manage_policies(&actor(Role::Employee, company, None)));
    }

    #[test]
    fn audit_scope_all_is_super_admin_only() {
        let company = CompanyId::new();
        assert!(can_view_audit(&actor(Role::SuperAdmin, company, None), AuditScope::All));
        for role in [Role::CompanyAdmin, Role::Dpo, Role::Auditor] {
            let a = actor(role, company, None);
            assert!(!can_view_audit(&a, AuditScope::All));
            assert!(can_view_audit(&a, AuditScope::Company));
            assert!(can_view_audit(&a, AuditScope::Department));
        }
        let employee = actor(Role::Employee, company, Some(DepartmentId::new()));
        assert!(can_view_audit(&employee, AuditScope::Department));
        assert!(!can_view_audit(&employee, AuditScope::Company));
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the company boundary is unconditional. For any role and
        /// any department layout, a cross-company file denies read, write,
        /// and share alike.
        #[test]
        fn cross_company_denies_everything(
            role in role_strategy(),
            actor_has_dept in any::<bool>(),
            file_has_dept in any::<bool>(),
        ) {
            let dept = DepartmentId::new();
            let a = actor(
                role,
                CompanyId::new(),
                actor_has_dept.then_some(dept),
            );
            let f = file_in(CompanyId::new(), file_has_dept.then_some(dept));

            prop_assert!(!can_read_file(&a, &f));
            prop_assert!(!can_write_file(&a, &f));
            prop_assert!(!can_share_file(&a, &f));
        }

        /// Property: write and share imply read, for every role.
        #[test]
        fn write_and_share_imply_read(
            role in role_strategy(),
            same_company in any::<bool>(),
            same_dept in any::<bool>(),
            is_creator in any::<bool>(),
        ) {
            let company = CompanyId::new();
            let dept = DepartmentId::new();
            let a = actor(role, company, Some(dept));
            let mut f = file_in(
                if same_company { company } else { CompanyId::new() },
                Some(if same_dept { dept } else { DepartmentId::new() }),
            );
            if is_creator {
                f.created_by_user_id = a.id;
            }

            prop_assert!(!can_write_file(&a, &f) || can_read_file(&a, &f));
            prop_assert!(!can_share_file(&a, &f) || can_read_file(&a, &f));
        }
    }
}
