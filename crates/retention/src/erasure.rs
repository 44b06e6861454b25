//! The erase-and-prove pipeline.
//!
//! Per file: hash the stored bytes, delete from the storage backend, create
//! the proof, and only then flip the file to `Erased`. A failed storage
//! delete leaves the file in `PendingErasure` with no partial proof, so the
//! batch is safely re-entrant per file. Concurrent runs are idempotent by
//! status guard: a file that is no longer `PendingErasure` is skipped.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

use shareguard_access::can_manage_policies;
use shareguard_audit::{AuditEvent, AuditSink, EventType, TargetRef};
use shareguard_auth::Actor;
use shareguard_core::{DomainError, DomainResult, FileId, ProofId};
use shareguard_files::{DeletionStatus, File};

use crate::policy::{ErasureProof, FileRetention, RetentionPolicy};

/// Failure reported by the storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct StoreError(pub String);

/// The storage collaborator the pipeline deletes from.
///
/// Implemented outside this crate (CDN client, filesystem, ...). The
/// pipeline only ever fetches for hashing and deletes.
pub trait ObjectStore {
    fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn delete(&self, path: &str) -> Result<(), StoreError>;
}

/// Files whose newest auto-delete assignment has lapsed at `now`.
///
/// Only `Active` and `SoftDeleted` files are eligible; anything under a
/// legal hold is excluded outright.
pub fn erasure_due(
    files: &[File],
    retentions: &[FileRetention],
    policies: &[RetentionPolicy],
    now: DateTime<Utc>,
) -> Vec<FileId> {
    files
        .iter()
        .filter(|file| {
            matches!(
                file.deletion_status,
                DeletionStatus::Active | DeletionStatus::SoftDeleted
            )
        })
        .filter(|file| {
            let rows: Vec<_> = retentions
                .iter()
                .filter(|row| row.file_id == file.id)
                .collect();
            if rows.is_empty() || rows.iter().any(|row| row.under_legal_hold) {
                return false;
            }
            rows.iter().any(|row| {
                policies
                    .iter()
                    .find(|policy| policy.id == row.policy_id)
                    .is_some_and(|policy| {
                        policy.auto_delete
                            && policy.duration_days.is_some_and(|days| {
                                row.assigned_at + Duration::days(i64::from(days)) <= now
                            })
                    })
            })
        })
        .map(|file| file.id)
        .collect()
}

/// One file queued for erasure, with its retention history attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErasureCandidate {
    pub file: File,
    pub retentions: Vec<FileRetention>,
}

/// The proof-and-status pair for one successfully erased file.
///
/// Returned as a unit so the persistence collaborator can commit the proof
/// insert and the status flip in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErasedFile {
    pub file: File,
    pub proof: ErasureProof,
}

/// Per-file result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErasureOutcome {
    pub file_id: FileId,
    pub ok: bool,
    pub error: Option<String>,
    pub erased: Option<ErasedFile>,
}

/// Batch summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErasureBatch {
    pub processed: usize,
    pub failed: usize,
    pub results: Vec<ErasureOutcome>,
}

/// Erase every eligible candidate, isolating per-file failures.
///
/// Restricted to policy managers. Candidates are filtered unconditionally to
/// the actor's company, to `PendingErasure` status, and to files with no
/// legal hold on any assignment — held files are not attempted at all and do
/// not appear in the results.
pub fn process_erasure(
    actor: &Actor,
    candidates: Vec<ErasureCandidate>,
    store: &dyn ObjectStore,
    sink: &dyn AuditSink,
    now: DateTime<Utc>,
) -> DomainResult<ErasureBatch> {
    if !can_manage_policies(actor) {
        return Err(DomainError::forbidden());
    }

    let mut results = Vec::new();
    for candidate in candidates {
        let file = candidate.file;
        if file.company_id != actor.company_id {
            tracing::warn!(file_id = %file.id, "erasure candidate from another company; skipping");
            continue;
        }
        if file.deletion_status != DeletionStatus::PendingErasure {
            continue;
        }
        if candidate.retentions.iter().any(|row| row.under_legal_hold) {
            continue;
        }

        let hash_before_delete = match store.fetch(&file.storage_path) {
            Ok(Some(bytes)) => Some(hex::encode(Sha256::digest(&bytes))),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(file_id = %file.id, %err, "content fetch failed; erasing without hash");
                None
            }
        };

        if let Err(err) = store.delete(&file.storage_path) {
            results.push(ErasureOutcome {
                file_id: file.id,
                ok: false,
                error: Some(err.to_string()),
                erased: None,
            });
            continue;
        }

        // Proof first, status flip second.
        let proof = ErasureProof {
            id: ProofId::new(),
            company_id: file.company_id,
            file_id: file.id,
            policy_id: candidate.retentions.first().map(|row| row.policy_id),
            erased_at: now,
            erased_by_user_id: actor.id,
            method: "storage-delete".to_string(),
            hash_before_delete,
        };
        let mut erased_file = file;
        if let Err(err) = erased_file.mark_erased(proof.id) {
            results.push(ErasureOutcome {
                file_id: erased_file.id,
                ok: false,
                error: Some(err.to_string()),
                erased: None,
            });
            continue;
        }

        sink.record(AuditEvent::new(
            erased_file.company_id,
            Some(actor.id),
            EventType::FileErased,
            Some(TargetRef::File(erased_file.id)),
            serde_json::json!({
                "fileName": erased_file.name,
                "proofId": proof.id,
                "hashBeforeDelete": proof.hash_before_delete,
            }),
            now,
        ));

        results.push(ErasureOutcome {
            file_id: erased_file.id,
            ok: true,
            error: None,
            erased: Some(ErasedFile {
                file: erased_file,
                proof,
            }),
        });
    }

    let processed = results.iter().filter(|r| r.ok).count();
    let failed = results.len() - processed;
    Ok(ErasureBatch {
        processed,
        failed,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use shareguard_audit::InMemoryAuditSink;
    use shareguard_auth::Role;
    use shareguard_core::{CompanyId, FolderId, PolicyId, RetentionId, UserId};
    use shareguard_files::{GdprRiskLevel, MalwareStatus};

    /// Storage fake: objects by path, with selectable delete failures.
    #[derive(Default)]
    struct TestStore {
        objects: Mutex<HashMap<String, Vec<u8>>>,
        failing: HashSet<String>,
    }

    impl TestStore {
        fn with_object(self, path: &str, bytes: &[u8]) -> Self {
            self.objects
                .lock()
                .unwrap()
                .insert(path.to_string(), bytes.to_vec());
            self
        }

        fn failing_on(mut self, path: &str) -> Self {
            self.failing.insert(path.to_string());
            self
        }

        fn contains(&self, path: &str) -> bool {
            self.objects.lock().unwrap().contains_key(path)
        }
    }

    impl ObjectStore for TestStore {
        fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Ok(self.objects.lock().unwrap().get(path).cloned())
        }

        fn delete(&self, path: &str) -> Result<(), StoreError> {
            if self.failing.contains(path) {
                return Err(StoreError("storage unavailable".to_string()));
            }
            self.objects.lock().unwrap().remove(path);
            Ok(())
        }
    }

    fn dpo(company_id: CompanyId) -> Actor {
        Actor {
            id: UserId::new(),
            role: Role::Dpo,
            company_id,
            department_id: None,
        }
    }

    fn pending_file(company_id: CompanyId, path: &str) -> File {
        File {
            id: FileId::new(),
            company_id,
            department_id: None,
            folder_id: FolderId::new(),
            created_by_user_id: UserId::new(),
            name: "old.pdf".to_string(),
            extension: Some(".pdf".to_string()),
            storage_path: path.to_string(),
            gdpr_risk_level: GdprRiskLevel::Unknown,
            malware_status: MalwareStatus::Clean,
            deletion_status: DeletionStatus::PendingErasure,
            deletion_proof_id: None,
            created_at: Utc::now(),
        }
    }

    fn retention_row(file_id: FileId, policy_id: PolicyId, under_legal_hold: bool) -> FileRetention {
        FileRetention {
            id: RetentionId::new(),
            file_id,
            policy_id,
            assigned_at: Utc::now(),
            under_legal_hold,
        }
    }

    fn candidate(file: File, under_legal_hold: bool) -> ErasureCandidate {
        let row = retention_row(file.id, PolicyId::new(), under_legal_hold);
        ErasureCandidate {
            file,
            retentions: vec![row],
        }
    }

    #[test]
    fn erases_with_proof_and_pre_delete_hash() {
        let company = CompanyId::new();
        let actor = dpo(company);
        let file = pending_file(company, "acme/old.pdf");
        let store = TestStore::default().with_object("acme/old.pdf", b"content");
        let sink = InMemoryAuditSink::new();

        let batch = process_erasure(
            &actor,
            vec![candidate(file, false)],
            &store,
            &sink,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(batch.processed, 1);
        assert_eq!(batch.failed, 0);
        let erased = batch.results[0].erased.as_ref().unwrap();
        assert_eq!(erased.file.deletion_status, DeletionStatus::Erased);
        assert_eq!(erased.file.deletion_proof_id, Some(erased.proof.id));
        assert_eq!(erased.proof.file_id, erased.file.id);
        assert_eq!(
            erased.proof.hash_before_delete.as_deref(),
            Some(hex::encode(Sha256::digest(b"content")).as_str())
        );
        assert!(!store.contains("acme/old.pdf"));
        assert_eq!(sink.events()[0].event_type, EventType::FileErased);
    }

    #[test]
    fn legal_hold_is_never_attempted() {
        let company = CompanyId::new();
        let actor = dpo(company);
        let held = pending_file(company, "acme/held.pdf");
        let held_id = held.id;
        let free = pending_file(company, "acme/free.pdf");
        let store = TestStore::default()
            .with_object("acme/held.pdf", b"a")
            .with_object("acme/free.pdf", b"b");
        let sink = InMemoryAuditSink::new();

        let batch = process_erasure(
            &actor,
            vec![candidate(held, true), candidate(free, false)],
            &store,
            &sink,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(batch.processed, 1);
        assert_eq!(batch.failed, 0);
        assert_eq!(batch.results.len(), 1);
        assert!(batch.results.iter().all(|r| r.file_id != held_id));
        // Held file's bytes are untouched.
        assert!(store.contains("acme/held.pdf"));
    }

    #[test]
    fn storage_failure_is_isolated_and_leaves_file_re_entrant() {
        let company = CompanyId::new();
        let actor = dpo(company);
        let bad = pending_file(company, "acme/bad.pdf");
        let bad_id = bad.id;
        let good = pending_file(company, "acme/good.pdf");
        let store = TestStore::default()
            .with_object("acme/bad.pdf", b"a")
            .with_object("acme/good.pdf", b"b")
            .failing_on("acme/bad.pdf");
        let sink = InMemoryAuditSink::new();

        let batch = process_erasure(
            &actor,
            vec![candidate(bad, false), candidate(good, false)],
            &store,
            &sink,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(batch.processed, 1);
        assert_eq!(batch.failed, 1);
        let failure = batch.results.iter().find(|r| !r.ok).unwrap();
        assert_eq!(failure.file_id, bad_id);
        assert!(failure.error.as_deref().unwrap().contains("storage unavailable"));
        assert!(failure.erased.is_none());
        // Only the success is audited; the failure is reported for retry.
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn non_pending_and_foreign_files_are_skipped() {
        let company = CompanyId::new();
        let actor = dpo(company);
        let mut already_erased = pending_file(company, "a");
        already_erased.deletion_status = DeletionStatus::Erased;
        let foreign = pending_file(CompanyId::new(), "b");
        let store = TestStore::default();
        let sink = InMemoryAuditSink::new();

        let batch = process_erasure(
            &actor,
            vec![candidate(already_erased, false), candidate(foreign, false)],
            &store,
            &sink,
            Utc::now(),
        )
        .unwrap();
        assert!(batch.results.is_empty());
    }

    #[test]
    fn missing_content_erases_without_hash() {
        let company = CompanyId::new();
        let actor = dpo(company);
        let file = pending_file(company, "acme/gone.pdf");
        let store = TestStore::default();
        let sink = InMemoryAuditSink::new();

        let batch = process_erasure(
            &actor,
            vec![candidate(file, false)],
            &store,
            &sink,
            Utc::now(),
        )
        .unwrap();
        let erased = batch.results[0].erased.as_ref().unwrap();
        assert_eq!(erased.proof.hash_before_delete, None);
    }

    #[test]
    fn only_policy_managers_may_run_the_batch() {
        let company = CompanyId::new();
        let manager = Actor {
            id: UserId::new(),
            role: Role::DepartmentManager,
            company_id: company,
            department_id: None,
        };
        let store = TestStore::default();
        let sink = InMemoryAuditSink::new();

        let err = process_erasure(&manager, Vec::new(), &store, &sink, Utc::now()).unwrap_err();
        assert_eq!(err, DomainError::Forbidden);
    }

    #[test]
    fn due_files_respect_duration_and_holds() {
        let company = CompanyId::new();
        let now = Utc::now();
        let policy = RetentionPolicy {
            id: PolicyId::new(),
            company_id: company,
            name: "Short".to_string(),
            description: None,
            duration_days: Some(30),
            auto_delete: true,
            legal_hold_allowed: true,
        };

        let mut lapsed = pending_file(company, "a");
        lapsed.deletion_status = DeletionStatus::Active;
        let mut fresh = pending_file(company, "b");
        fresh.deletion_status = DeletionStatus::Active;
        let mut held = pending_file(company, "c");
        held.deletion_status = DeletionStatus::Active;

        let mut lapsed_row = retention_row(lapsed.id, policy.id, false);
        lapsed_row.assigned_at = now - Duration::days(31);
        let fresh_row = retention_row(fresh.id, policy.id, false);
        let mut held_row = retention_row(held.id, policy.id, true);
        held_row.assigned_at = now - Duration::days(90);

        let due = erasure_due(
            &[lapsed.clone(), fresh, held],
            &[lapsed_row, fresh_row, held_row],
            &[policy],
            now,
        );
        assert_eq!(due, vec![lapsed.id]);
    }

    #[test]
    fn manual_policies_never_come_due() {
        let company = CompanyId::new();
        let now = Utc::now();
        let policy = RetentionPolicy {
            id: PolicyId::new(),
            company_id: company,
            name: "Manual".to_string(),
            description: None,
            duration_days: Some(1),
            auto_delete: false,
            legal_hold_allowed: false,
        };
        let mut file = pending_file(company, "a");
        file.deletion_status = DeletionStatus::Active;
        let mut row = retention_row(file.id, policy.id, false);
        row.assigned_at = now - Duration::days(400);

        assert!(erasure_due(&[file], &[row], &[policy], now).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every file that reaches `Erased` carries a proof whose
        /// ids line up, and no held file ever appears in the results.
        #[test]
        fn erased_implies_matching_proof_and_holds_are_exempt(
            holds in prop::collection::vec(any::<bool>(), 1..8)
        ) {
            let company = CompanyId::new();
            let actor = dpo(company);
            let store = TestStore::default();
            let sink = InMemoryAuditSink::new();

            let mut held_ids = Vec::new();
            let candidates: Vec<_> = holds
                .iter()
                .enumerate()
                .map(|(i, &hold)| {
                    let file = pending_file(company, &format!("p/{i}"));
                    if hold {
                        held_ids.push(file.id);
                    }
                    candidate(file, hold)
                })
                .collect();

            let batch =
                process_erasure(&actor, candidates, &store, &sink, Utc::now()).unwrap();

            for outcome in &batch.results {
                prop_assert!(!held_ids.contains(&outcome.file_id));
                if outcome.ok {
                    let erased = outcome.erased.as_ref().unwrap();
                    prop_assert_eq!(erased.file.deletion_status, DeletionStatus::Erased);
                    prop_assert_eq!(erased.file.deletion_proof_id, Some(erased.proof.id));
                    prop_assert_eq!(erased.proof.file_id, erased.file.id);
                }
            }
            prop_assert_eq!(
                batch.results.len(),
                holds.iter().filter(|h| !**h).count()
            );
        }
    }
}
