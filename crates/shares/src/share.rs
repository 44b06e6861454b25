use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shareguard_core::{CompanyId, DomainError, DomainResult, Entity, FileId, ShareId, UserId};

use crate::otp;

/// How a share is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShareType {
    ExternalOtp,
}

/// Why a share can or cannot be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareAccessState {
    Available,
    Revoked,
    Expired,
    Exhausted,
}

/// An external share of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileShare {
    pub id: ShareId,
    pub company_id: CompanyId,
    pub file_id: FileId,
    pub created_by_user_id: UserId,
    pub share_type: ShareType,
    /// Argon2 PHC string; the raw OTP is never stored.
    pub otp_hash: Option<String>,
    pub otp_length: u32,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_downloads: Option<u32>,
    pub remaining_downloads: Option<u32>,
    pub is_revoked: bool,
    pub last_otp_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Entity for FileShare {
    type Id = ShareId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl FileShare {
    /// Usability at `now`. Revocation wins over expiry, expiry over an
    /// exhausted download budget.
    pub fn access_state(&self, now: DateTime<Utc>) -> ShareAccessState {
        if self.is_revoked {
            return ShareAccessState::Revoked;
        }
        if self.expires_at.is_some_and(|at| at < now) {
            return ShareAccessState::Expired;
        }
        if self.remaining_downloads == Some(0) {
            return ShareAccessState::Exhausted;
        }
        ShareAccessState::Available
    }

    /// Check a presented OTP against this share.
    ///
    /// A revoked share reads as missing (the recipient learns nothing); a
    /// dead-but-existing share is a conflict; a wrong OTP is forbidden.
    pub fn verify_otp(&self, presented: &str, now: DateTime<Utc>) -> DomainResult<()> {
        match self.access_state(now) {
            ShareAccessState::Revoked => return Err(DomainError::not_found()),
            ShareAccessState::Expired => return Err(DomainError::conflict("share expired")),
            ShareAccessState::Exhausted => {
                return Err(DomainError::conflict("no downloads remaining"));
            }
            ShareAccessState::Available => {}
        }
        let Some(stored) = &self.otp_hash else {
            return Err(DomainError::validation("otp not required for this share"));
        };
        if !otp::verify_otp(stored, presented.trim()) {
            return Err(DomainError::forbidden());
        }
        Ok(())
    }

    /// Spend one download from a bounded budget; unlimited shares pass.
    pub fn consume_download(&mut self) -> DomainResult<()> {
        match self.remaining_downloads {
            Some(0) => Err(DomainError::conflict("no downloads remaining")),
            Some(n) => {
                self.remaining_downloads = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn revoke(&mut self) {
        self.is_revoked = true;
    }

    /// Record that the OTP was (re)sent to the recipient.
    pub fn otp_sent(&mut self, now: DateTime<Utc>) {
        self.last_otp_sent_at = Some(now);
    }
}
