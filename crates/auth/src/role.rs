use serde::{Deserialize, Serialize};

/// Role of an acting principal.
///
/// Roles are a closed enum on purpose: every permission predicate matches on
/// them exhaustively, so adding a role forces each decision site to be
/// revisited. There is no single privilege ordering — DPO and AUDITOR have
/// broad read but not full write — so nothing here implements `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Global admin for the SaaS.
    SuperAdmin,
    /// Manages company settings, departments, users, policies.
    CompanyAdmin,
    /// Data protection officer: views all GDPR logs, manages policies,
    /// approves risky operations.
    Dpo,
    /// Read-only access to logs, limited file access.
    Auditor,
    /// Manages files and shares within their department.
    DepartmentManager,
    /// Limited to their own files and department rules.
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::CompanyAdmin => "COMPANY_ADMIN",
            Role::Dpo => "DPO",
            Role::Auditor => "AUDITOR",
            Role::DepartmentManager => "DEPARTMENT_MANAGER",
            Role::Employee => "EMPLOYEE",
        }
    }

    /// All roles, for exhaustive property tests.
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::CompanyAdmin,
        Role::Dpo,
        Role::Auditor,
        Role::DepartmentManager,
        Role::Employee,
    ];
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
