//! Share creation through the access predicates and the GDPR gate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use shareguard_access::can_share_file;
use shareguard_audit::{AuditEvent, AuditSink, EventType, TargetRef};
use shareguard_auth::Actor;
use shareguard_core::{DomainError, DomainResult, ShareId};
use shareguard_files::File;
use shareguard_gdpr::{GateDecision, evaluate_external_share};

use crate::otp;
use crate::share::{FileShare, ShareType};

const DEFAULT_EXPIRY_HOURS: u32 = 24;
const MAX_EXPIRY_HOURS: u32 = 720;

/// Caller-supplied knobs for a new share.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShareRequest {
    pub recipient_email: Option<String>,
    /// Clamped to 1..=720 hours; defaults to 24.
    pub expires_in_hours: Option<u32>,
    /// `None` means unlimited downloads.
    pub max_downloads: Option<u32>,
    pub gdpr_override: bool,
}

/// A created share plus the one-time password to deliver out of band.
///
/// The raw OTP exists only in this return value; the share stores its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedShare {
    pub share: FileShare,
    pub otp: String,
}

/// Create an external OTP share for `file`.
pub fn create_share(
    actor: &Actor,
    file: &File,
    request: &CreateShareRequest,
    sink: &dyn AuditSink,
    now: DateTime<Utc>,
) -> DomainResult<CreatedShare> {
    if !actor.in_company(file.company_id) {
        return Err(DomainError::not_found());
    }

    if !can_share_file(actor, file) {
        sink.record(AuditEvent::new(
            file.company_id,
            Some(actor.id),
            EventType::FileShareCreate,
            Some(TargetRef::File(file.id)),
            serde_json::json!({
                "blocked": true,
                "reason": "access_denied",
                "fileName": file.name,
            }),
            now,
        ));
        return Err(DomainError::forbidden());
    }

    if !file.deletion_status.is_active() {
        return Err(DomainError::conflict("file is not available"));
    }

    match evaluate_external_share(actor, file, request.gdpr_override) {
        GateDecision::Blocked(blocked) => {
            sink.record(AuditEvent::new(
                file.company_id,
                Some(actor.id),
                EventType::GdprShareBlocked,
                Some(TargetRef::File(file.id)),
                serde_json::json!({
                    "fileName": file.name,
                    "gdprRiskLevel": file.gdpr_risk_level.as_str(),
                }),
                now,
            ));
            Err(DomainError::gdpr_blocked(blocked.message))
        }
        GateDecision::Allowed { override_used } => {
            let otp = otp::generate_otp();
            let otp_hash = otp::hash_otp(&otp)?;

            let expires_in_hours = request
                .expires_in_hours
                .unwrap_or(DEFAULT_EXPIRY_HOURS)
                .clamp(1, MAX_EXPIRY_HOURS);

            let share = FileShare {
                id: ShareId::new(),
                company_id: file.company_id,
                file_id: file.id,
                created_by_user_id: actor.id,
                share_type: ShareType::ExternalOtp,
                otp_hash: Some(otp_hash),
                otp_length: otp::OTP_LENGTH,
                expires_at: Some(now + Duration::hours(i64::from(expires_in_hours))),
                max_downloads: request.max_downloads,
                remaining_downloads: request.max_downloads,
                is_revoked: false,
                last_otp_sent_at: None,
                created_at: now,
            };

            sink.record(AuditEvent::new(
                file.company_id,
                Some(actor.id),
                EventType::FileShareCreate,
                Some(TargetRef::Share(share.id)),
                serde_json::json!({
                    "fileId": file.id,
                    "fileName": file.name,
                    "recipientEmail": request.recipient_email,
                    "overrideUsed": override_used,
                }),
                now,
            ));

            Ok(CreatedShare { share, otp })
        }
    }
}
