// Document audit record: who created/last modified, and when

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::email::EmailAddress;

/// Creation and last-modification audit fields, kept as one value so a
/// document's audit trail is set and replaced atomically.
///
/// Timestamps are UTC and come from the caller's injected clock; the
/// registry never reads the system clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditInfo {
    pub created_by: EmailAddress,
    pub created_timestamp: DateTime<Utc>,
    pub modified_by: EmailAddress,
    pub modified_timestamp: DateTime<Utc>,
}

impl AuditInfo {
    /// A fresh record: creator and modifier are the same principal.
    pub fn created(by: EmailAddress, at: DateTime<Utc>) -> AuditInfo {
        AuditInfo {
            created_by: by.clone(),
            created_timestamp: at,
            modified_by: by,
            modified_timestamp: at,
        }
    }

    /// A copy with the modification fields replaced; creation fields are
    /// immutable once written.
    pub fn modified(&self, by: EmailAddress, at: DateTime<Utc>) -> AuditInfo {
        AuditInfo {
            created_by: self.created_by.clone(),
            created_timestamp: self.created_timestamp,
            modified_by: by,
            modified_timestamp: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn email(address: &str) -> EmailAddress {
        EmailAddress::parse(address).unwrap()
    }

    #[test]
    fn test_created_sets_both_principals() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let audit = AuditInfo::created(email("alice@example.com"), at);
        assert_eq!(audit.created_by, audit.modified_by);
        assert_eq!(audit.created_timestamp, at);
        assert_eq!(audit.modified_timestamp, at);
    }

    #[test]
    fn test_modified_preserves_creation_fields() {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let modified_at = Utc.with_ymd_and_hms(2024, 5, 2, 17, 0, 0).unwrap();
        let audit = AuditInfo::created(email("alice@example.com"), created_at)
            .modified(email("bob@example.com"), modified_at);
        assert_eq!(audit.created_by, email("alice@example.com"));
        assert_eq!(audit.created_timestamp, created_at);
        assert_eq!(audit.modified_by, email("bob@example.com"));
        assert_eq!(audit.modified_timestamp, modified_at);
    }
}
