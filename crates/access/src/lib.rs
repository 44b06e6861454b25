//! `shareguard-access` — pure access decisions.
//!
//! Two layers: the role/ownership **base predicates** (no IO, no overlay
//! lookups) and the **folder permission overlay** that widens — never
//! restricts — what the base rules allow. Callers check the base predicate
//! first and consult the overlay before turning a base denial into a final
//! one.

pub mod overlay;
pub mod predicates;

pub use overlay::{
    GrantRequest, can_manage_permissions, can_read_folder_with_overlay,
    can_write_folder_with_overlay, overlay_allows, remove_permission, upsert_permission,
};
pub use predicates::{
    AuditScope, can_manage_policies, can_read_file, can_read_folder, can_share_file,
    can_view_audit, can_write_file, can_write_folder,
};
