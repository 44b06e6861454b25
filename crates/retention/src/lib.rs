//! `shareguard-retention` — retention policies and provable erasure.
//!
//! Policies are assigned to files (directly or across a folder subtree),
//! files whose auto-delete window has lapsed become erasure candidates, and
//! the erasure pipeline deletes them from storage with a pre-deletion content
//! hash captured in an immutable proof. No file ever reaches `Erased` without
//! its proof existing first.

pub mod assign;
pub mod erasure;
pub mod policy;

pub use assign::{assign_policy, assign_policy_to_folder, delete_policy, place_legal_hold};
pub use erasure::{
    ErasedFile, ErasureBatch, ErasureCandidate, ErasureOutcome, ObjectStore, StoreError,
    erasure_due, process_erasure,
};
pub use policy::{ErasureProof, FileRetention, RetentionPolicy};
