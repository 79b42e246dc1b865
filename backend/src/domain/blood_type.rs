//! ABO/Rh blood type labels.
//!
//! The label set is closed: anything outside the eight recognised strings is
//! rejected with [`InvalidTypeLabel`] before it can reach the inventory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a string is not one of the eight recognised type labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised blood type label: {label:?}")]
pub struct InvalidTypeLabel {
    pub label: String,
}

/// One of the eight ABO/Rh blood types tracked by every bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BloodType {
    ONegative,
    OPositive,
    ANegative,
    APositive,
    BNegative,
    BPositive,
    AbNegative,
    AbPositive,
}

impl BloodType {
    /// Every label, in the canonical display order.
    pub const ALL: [Self; 8] = [
        Self::ONegative,
        Self::OPositive,
        Self::ANegative,
        Self::APositive,
        Self::BNegative,
        Self::BPositive,
        Self::AbNegative,
        Self::AbPositive,
    ];

    /// The canonical label, e.g. `"AB+"`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ONegative => "O-",
            Self::OPositive => "O+",
            Self::ANegative => "A-",
            Self::APositive => "A+",
            Self::BNegative => "B-",
            Self::BPositive => "B+",
            Self::AbNegative => "AB-",
            Self::AbPositive => "AB+",
        }
    }

    /// Position of this type in [`BloodType::ALL`].
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::ONegative => 0,
            Self::OPositive => 1,
            Self::ANegative => 2,
            Self::APositive => 3,
            Self::BNegative => 4,
            Self::BPositive => 5,
            Self::AbNegative => 6,
            Self::AbPositive => 7,
        }
    }
}

impl FromStr for BloodType {
    type Err = InvalidTypeLabel;

    /// Labels are matched exactly (after trimming); `"ab+"` is not `"AB+"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|blood_type| blood_type.label() == trimmed)
            .ok_or_else(|| InvalidTypeLabel {
                label: s.to_owned(),
            })
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<BloodType> for String {
    fn from(value: BloodType) -> Self {
        value.label().to_owned()
    }
}

impl TryFrom<String> for BloodType {
    type Error = InvalidTypeLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("O-", BloodType::ONegative)]
    #[case("O+", BloodType::OPositive)]
    #[case("A-", BloodType::ANegative)]
    #[case("A+", BloodType::APositive)]
    #[case("B-", BloodType::BNegative)]
    #[case("B+", BloodType::BPositive)]
    #[case("AB-", BloodType::AbNegative)]
    #[case(" AB+ ", BloodType::AbPositive)]
    fn parses_recognised_labels(#[case] raw: &str, #[case] expected: BloodType) {
        assert_eq!(raw.parse::<BloodType>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("ab+")]
    #[case("AB")]
    #[case("C+")]
    #[case("O")]
    fn rejects_unknown_labels(#[case] raw: &str) {
        let err = raw.parse::<BloodType>().expect_err("label must be rejected");
        assert_eq!(err.label, raw);
    }

    #[test]
    fn index_matches_position_in_all() {
        for (position, blood_type) in BloodType::ALL.into_iter().enumerate() {
            assert_eq!(blood_type.index(), position);
        }
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&BloodType::AbNegative).expect("serialise");
        assert_eq!(json, "\"AB-\"");
        let parsed: BloodType = serde_json::from_str("\"B+\"").expect("deserialise");
        assert_eq!(parsed, BloodType::BPositive);
        assert!(serde_json::from_str::<BloodType>("\"Z+\"").is_err());
    }
}
