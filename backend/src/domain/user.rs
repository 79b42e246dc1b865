//! User data model.
//!
//! A user is registered once with a fixed [`Role`], a [`BloodType`] and a
//! [`Location`]. None of these change after registration; the role in
//! particular is trusted by the ledger once the HTTP boundary has checked it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::BloodType;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("location must not be empty")]
    EmptyLocation,
    #[error("location must be at most {max} characters")]
    LocationTooLong { max: usize },
    #[error("role must be \"donor\" or \"recipient\"")]
    UnknownRole { value: String },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 150;
/// Maximum allowed length for a location label.
pub const LOCATION_MAX: usize = 100;

/// Unique login name, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text location label shared by users, banks and requests.
///
/// Locations are compared exactly; `"North"` and `"north"` are different
/// places as far as the dashboard and donor search are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    const UNKNOWN: &'static str = "Unknown";

    pub fn new(location: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = location.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyLocation);
        }
        if trimmed.chars().count() > LOCATION_MAX {
            return Err(UserValidationError::LocationTooLong { max: LOCATION_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Sentinel recorded on requests that targeted a bank that does not exist.
    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_owned())
    }
}

impl AsRef<str> for Location {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Location> for String {
    fn from(value: Location) -> Self {
        value.0
    }
}

impl TryFrom<String> for Location {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Recipient,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Recipient => "recipient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "donor" => Ok(Self::Donor),
            "recipient" => Ok(Self::Recipient),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Application user.
///
/// ## Invariants
/// - `username` is unique across all users (enforced by repositories).
/// - `role`, `blood_type` and `location` are fixed at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "ada")]
    username: Username,
    #[schema(value_type = String, example = "O-")]
    blood_type: BloodType,
    #[schema(value_type = String, example = "North")]
    location: Location,
    role: Role,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(
        id: UserId,
        username: Username,
        blood_type: BloodType,
        location: Location,
        role: Role,
    ) -> Self {
        Self {
            id,
            username,
            blood_type,
            location,
            role,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn blood_type(&self) -> BloodType {
        self.blood_type
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
