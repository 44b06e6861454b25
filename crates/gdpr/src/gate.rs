//! GDPR gate: per-action risk evaluation.
//!
//! State machine per protected action: a request transitions to `Allowed` or
//! `Blocked`. The gate is pure — it decides; recording and status changes
//! stay with the lifecycle operations.

use serde::{Deserialize, Serialize};

use shareguard_auth::{Actor, Role};
use shareguard_files::{File, Folder, GdprRiskLevel};

/// The actions the gate intercepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedAction {
    FileDelete,
    FileExternalShare,
    FolderDelete,
}

impl ProtectedAction {
    fn verb(&self) -> &'static str {
        match self {
            ProtectedAction::FileDelete | ProtectedAction::FolderDelete => "deletion",
            ProtectedAction::FileExternalShare => "sharing",
        }
    }
}

/// What tripped the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockTrigger {
    FileRisk(GdprRiskLevel),
    FolderPersonalData,
}

impl BlockTrigger {
    /// Stable label recorded in audit metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockTrigger::FileRisk(risk) => risk.as_str(),
            BlockTrigger::FolderPersonalData => "CONTAINS_PERSONAL_DATA",
        }
    }
}

/// A denied gate transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocked {
    pub action: ProtectedAction,
    pub trigger: BlockTrigger,
    /// Denial text for the 403 body, already tailored to the actor's role.
    pub message: String,
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed {
        /// True when the action went through only because of an explicit,
        /// authorized override. Stamped into the action's audit metadata.
        override_used: bool,
    },
    Blocked(Blocked),
}

/// Roles that may override the gate.
pub fn can_override(role: Role) -> bool {
    matches!(role, Role::Dpo | Role::CompanyAdmin | Role::SuperAdmin)
}

/// The denial text reveals the override path only to roles that could take
/// it; everyone else gets a neutral message that names neither the mechanism
/// nor the exact risk classification.
fn denial_message(action: ProtectedAction, trigger: BlockTrigger, role: Role) -> String {
    if can_override(role) {
        format!(
            "{} blocked: {}; override required (set gdpr_override)",
            action.verb(),
            trigger.as_str()
        )
    } else {
        format!(
            "{} blocked: content is marked as containing personal data; contact your data protection officer",
            action.verb()
        )
    }
}

fn decide(
    action: ProtectedAction,
    risky: bool,
    trigger: BlockTrigger,
    actor: &Actor,
    override_requested: bool,
) -> GateDecision {
    if !risky {
        return GateDecision::Allowed {
            override_used: false,
        };
    }
    if override_requested && can_override(actor.role) {
        return GateDecision::Allowed {
            override_used: true,
        };
    }
    GateDecision::Blocked(Blocked {
        action,
        trigger,
        message: denial_message(action, trigger, actor.role),
    })
}

/// File deletion: gated on `ConfirmedPii` only.
pub fn evaluate_file_delete(actor: &Actor, file: &File, override_requested: bool) -> GateDecision {
    decide(
        ProtectedAction::FileDelete,
        file.gdpr_risk_level.blocks_deletion(),
        BlockTrigger::FileRisk(file.gdpr_risk_level),
        actor,
        override_requested,
    )
}

/// External share: gated on `PossiblePii` as well as `ConfirmedPii`.
pub fn evaluate_external_share(
    actor: &Actor,
    file: &File,
    override_requested: bool,
) -> GateDecision {
    decide(
        ProtectedAction::FileExternalShare,
        file.gdpr_risk_level.blocks_external_share(),
        BlockTrigger::FileRisk(file.gdpr_risk_level),
        actor,
        override_requested,
    )
}

/// Folder deletion: gated on the folder-level personal-data marking.
pub fn evaluate_folder_delete(
    actor: &Actor,
    folder: &Folder,
    override_requested: bool,
) -> GateDecision {
    decide(
        ProtectedAction::FolderDelete,
        folder.contains_personal_data,
        BlockTrigger::FolderPersonalData,
        actor,
        override_requested,
    )
}
