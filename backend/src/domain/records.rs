//! Append-only donation and request records.
//!
//! Records are written once by the ledger service and never updated. They
//! denormalise what the dashboard needs (type, location, outcome) rather than
//! forming an audit trail of counter changes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{BloodBankId, BloodType, Fulfilment, Location, UserId};

/// Maximum length of the free-text donation note.
pub const POST_CONTENT_MAX: usize = 255;

/// Validation errors for record inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    #[error("content must not be empty")]
    EmptyContent,
    #[error("content must be at most {max} characters")]
    ContentTooLong { max: usize },
}

/// Free-text note attached to a donation post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostContent(String);

impl PostContent {
    pub fn new(content: impl AsRef<str>) -> Result<Self, RecordValidationError> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecordValidationError::EmptyContent);
        }
        if trimmed.chars().count() > POST_CONTENT_MAX {
            return Err(RecordValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Identifier shared by both record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

/// A donor's post, written after a successful donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    #[schema(value_type = String)]
    pub id: RecordId,
    #[schema(value_type = String)]
    pub donor_id: UserId,
    #[schema(value_type = String)]
    pub blood_bank_id: BloodBankId,
    #[schema(value_type = String, example = "Happy to help")]
    pub content: PostContent,
    pub created_at: DateTime<Utc>,
}

/// A recipient's request and whether the ledger fulfilled it.
///
/// `blood_bank_id` is kept as submitted even when no such bank exists; in
/// that case `location` is [`Location::unknown`] and `fulfilled` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    #[schema(value_type = String)]
    pub id: RecordId,
    #[schema(value_type = String)]
    pub requester_id: UserId,
    #[schema(value_type = String)]
    pub blood_bank_id: BloodBankId,
    #[schema(value_type = String, example = "AB+")]
    pub blood_type: BloodType,
    #[schema(value_type = String, example = "Downtown")]
    pub location: Location,
    pub fulfilled: bool,
    pub created_at: DateTime<Utc>,
}

/// A request before the ledger has adjudicated it.
///
/// Repository adapters turn a draft into its [`RequestRecord`] inside the
/// same unit of work that touches the bank's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    pub id: RecordId,
    pub requester_id: UserId,
    pub blood_bank_id: BloodBankId,
    pub blood_type: BloodType,
    pub created_at: DateTime<Utc>,
}

impl RequestDraft {
    /// Record for a request decided by a bank at `location`.
    pub fn adjudicated(&self, fulfilment: Fulfilment, location: Location) -> RequestRecord {
        self.record(fulfilment.is_fulfilled(), location)
    }

    /// Record for a request naming no existing bank.
    pub fn unmatched(&self) -> RequestRecord {
        self.record(false, Location::unknown())
    }

    fn record(&self, fulfilled: bool, location: Location) -> RequestRecord {
        RequestRecord {
            id: self.id,
            requester_id: self.requester_id,
            blood_bank_id: self.blood_bank_id,
            blood_type: self.blood_type,
            location,
            fulfilled,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", RecordValidationError::EmptyContent)]
    #[case("   ", RecordValidationError::EmptyContent)]
    fn blank_content_is_rejected(#[case] raw: &str, #[case] expected: RecordValidationError) {
        assert_eq!(PostContent::new(raw), Err(expected));
    }

    #[test]
    fn content_length_is_bounded() {
        assert!(PostContent::new("a".repeat(POST_CONTENT_MAX)).is_ok());
        assert_eq!(
            PostContent::new("a".repeat(POST_CONTENT_MAX + 1)),
            Err(RecordValidationError::ContentTooLong {
                max: POST_CONTENT_MAX
            })
        );
    }

    #[test]
    fn request_record_serialises_labels() {
        let record = RequestRecord {
            id: RecordId::random(),
            requester_id: UserId::random(),
            blood_bank_id: BloodBankId::random(),
            blood_type: BloodType::AbPositive,
            location: Location::unknown(),
            fulfilled: false,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(value["bloodType"], "AB+");
        assert_eq!(value["location"], "Unknown");
        assert_eq!(value["fulfilled"], false);
    }

    #[rstest]
    #[case(Fulfilment::Fulfilled, true)]
    #[case(Fulfilment::Unfulfilled, false)]
    fn drafts_carry_the_bank_decision(#[case] fulfilment: Fulfilment, #[case] expected: bool) {
        let draft = RequestDraft {
            id: RecordId::random(),
            requester_id: UserId::random(),
            blood_bank_id: BloodBankId::random(),
            blood_type: BloodType::BNegative,
            created_at: Utc::now(),
        };
        let location = Location::new("North").expect("location");

        let record = draft.adjudicated(fulfilment, location.clone());
        assert_eq!(record.fulfilled, expected);
        assert_eq!(record.location, location);
        assert_eq!(record.id, draft.id);

        let unmatched = draft.unmatched();
        assert!(!unmatched.fulfilled);
        assert_eq!(unmatched.location, Location::unknown());
        assert_eq!(unmatched.blood_bank_id, draft.blood_bank_id);
    }
}
