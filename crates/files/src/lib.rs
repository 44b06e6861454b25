//! `shareguard-files` — file and folder domain model.
//!
//! Entity snapshots, lifecycle state machines, folder permission grants, and
//! the arena-backed folder tree. Pure domain logic: snapshots come in from the
//! persistence collaborator, updated snapshots go back out. No IO.

pub mod file;
pub mod folder;
pub mod permission;
pub mod tree;

pub use file::{DeletionStatus, File, GdprRiskLevel, MalwareStatus};
pub use folder::Folder;
pub use permission::{AccessKind, FolderPermission, PermissionSet, Subject};
pub use tree::FolderTree;
