//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejected field produces `invalid_request` with
//! `details = {"field", "code", "value"?}` so clients can highlight the
//! offending input.

use actix_web::web;
use serde_json::json;

use crate::domain::{
    BloodBankId, BloodType, Error, InvalidTypeLabel, LoginValidationError, RecordValidationError,
    RegistrationValidationError, UserValidationError,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldErrorCode {
    EmptyField,
    TooLong,
    InvalidTypeLabel,
    InvalidUuid,
    UnknownRole,
    MalformedForm,
}

impl FieldErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyField => "empty_field",
            Self::TooLong => "too_long",
            Self::InvalidTypeLabel => "invalid_type_label",
            Self::InvalidUuid => "invalid_uuid",
            Self::UnknownRole => "unknown_role",
            Self::MalformedForm => "malformed_form",
        }
    }
}

/// Newtype wrapper for submitted field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

pub(crate) const USERNAME: FieldName = FieldName::new("username");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const BLOOD_TYPE: FieldName = FieldName::new("blood_type");
pub(crate) const BLOOD_TYPE_NEEDED: FieldName = FieldName::new("blood_type_needed");
pub(crate) const BLOOD_BANK_ID: FieldName = FieldName::new("blood_bank_id");
pub(crate) const LOCATION: FieldName = FieldName::new("location");
pub(crate) const ROLE: FieldName = FieldName::new("role");
pub(crate) const CONTENT: FieldName = FieldName::new("content");

pub(crate) fn field_error(
    field: FieldName,
    code: FieldErrorCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.0,
        "code": code.as_str(),
    }))
}

fn field_error_with_value(
    field: FieldName,
    code: FieldErrorCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.0,
        "code": code.as_str(),
        "value": value,
    }))
}

pub(crate) fn parse_blood_type(field: FieldName, raw: &str) -> Result<BloodType, Error> {
    raw.parse::<BloodType>()
        .map_err(|err| invalid_type_label(field, &err))
}

fn invalid_type_label(field: FieldName, err: &InvalidTypeLabel) -> Error {
    field_error_with_value(
        field,
        FieldErrorCode::InvalidTypeLabel,
        err.to_string(),
        &err.label,
    )
}

pub(crate) fn parse_bank_id(field: FieldName, raw: &str) -> Result<BloodBankId, Error> {
    raw.parse::<BloodBankId>().map_err(|_| {
        field_error_with_value(
            field,
            FieldErrorCode::InvalidUuid,
            "blood bank id must be a valid UUID",
            raw,
        )
    })
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let message = err.to_string();
    match err {
        UserValidationError::InvalidId => Error::internal(message),
        UserValidationError::EmptyUsername => {
            field_error(USERNAME, FieldErrorCode::EmptyField, message)
        }
        UserValidationError::UsernameTooLong { .. } => {
            field_error(USERNAME, FieldErrorCode::TooLong, message)
        }
        UserValidationError::EmptyLocation => {
            field_error(LOCATION, FieldErrorCode::EmptyField, message)
        }
        UserValidationError::LocationTooLong { .. } => {
            field_error(LOCATION, FieldErrorCode::TooLong, message)
        }
        UserValidationError::UnknownRole { value } => {
            field_error_with_value(ROLE, FieldErrorCode::UnknownRole, message, &value)
        }
    }
}

pub(crate) fn map_registration_error(err: RegistrationValidationError) -> Error {
    match err {
        RegistrationValidationError::User(err) => map_user_validation_error(err),
        RegistrationValidationError::BloodType(err) => invalid_type_label(BLOOD_TYPE, &err),
        RegistrationValidationError::EmptyPassword => field_error(
            PASSWORD,
            FieldErrorCode::EmptyField,
            "password must not be empty",
        ),
    }
}

pub(crate) fn map_login_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyUsername => USERNAME,
        LoginValidationError::EmptyPassword => PASSWORD,
    };
    field_error(field, FieldErrorCode::EmptyField, err.to_string())
}

pub(crate) fn map_content_error(err: RecordValidationError) -> Error {
    let code = match err {
        RecordValidationError::EmptyContent => FieldErrorCode::EmptyField,
        RecordValidationError::ContentTooLong { .. } => FieldErrorCode::TooLong,
    };
    field_error(CONTENT, code, err.to_string())
}

fn malformed_body(message: String) -> Error {
    Error::invalid_request(message)
        .with_details(json!({ "code": FieldErrorCode::MalformedForm.as_str() }))
}

/// Form extractor settings reporting malformed bodies as domain errors.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default()
        .error_handler(|err, _req| malformed_body(err.to_string()).into())
}

/// Query-string extractor settings matching [`form_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| malformed_body(err.to_string()).into())
}

/// Unwrap a body extracted as `Result` so handlers can check the session
/// before judging the input.
///
/// Errors raised by [`form_config`] or [`query_config`] come back as the
/// domain error they were built from.
pub(crate) fn extracted<T>(body: Result<T, actix_web::Error>) -> Result<T, Error> {
    body.map_err(|err| {
        err.as_error::<Error>()
            .cloned()
            .unwrap_or_else(|| malformed_body(err.to_string()))
    })
}
