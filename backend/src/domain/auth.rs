//! Authentication primitives: login credentials and registration input.
//!
//! Inbound adapters hand raw strings to these constructors so every
//! validation rule lives in the domain. Plain passwords are wrapped in
//! [`Zeroizing`] and cleared when the value drops.

use std::fmt;

use zeroize::Zeroizing;

use super::{BloodType, InvalidTypeLabel, Location, Role, UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use saveablood::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "hunter2").expect("valid");
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a registration form is rejected before reaching a repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error(transparent)]
    User(#[from] UserValidationError),
    #[error(transparent)]
    BloodType(#[from] InvalidTypeLabel),
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Raw registration fields as submitted by a client.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationInput<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub blood_type: &'a str,
    pub location: &'a str,
    pub role: &'a str,
}

/// Validated registration request.
///
/// The blood type label is checked here, at registration, so a donor's
/// stored type is always one of the eight recognised labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
    blood_type: BloodType,
    location: Location,
    role: Role,
}

impl Registration {
    pub fn try_from_input(input: RegistrationInput<'_>) -> Result<Self, RegistrationValidationError> {
        let username = Username::new(input.username)?;
        if input.password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        let blood_type = input.blood_type.parse::<BloodType>()?;
        let location = Location::new(input.location)?;
        let role = input.role.parse::<Role>()?;

        Ok(Self {
            username,
            password: Zeroizing::new(input.password.to_owned()),
            blood_type,
            location,
            role,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
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
