//! Domain primitives, ledger rules and services.
//!
//! Purpose: define the strongly typed entities shared by the HTTP and
//! persistence adapters, the inventory rules that govern donations and
//! requests, and the services that implement the driving ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - BloodType / Inventory: the closed label set and per-bank counters.
//! - BloodBank, User, DonationRecord, RequestRecord: persisted aggregates.
//! - IdentityService / LedgerService: driving port implementations.

pub mod auth;
pub mod blood_bank;
pub mod blood_type;
pub mod error;
pub mod identity_service;
pub mod inventory;
pub mod ledger_service;
pub mod password;
pub mod ports;
pub mod records;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, Registration, RegistrationInput,
    RegistrationValidationError,
};
pub use self::blood_bank::{BankSeed, BloodBank, BloodBankId, DEFAULT_BANKS};
pub use self::blood_type::{BloodType, InvalidTypeLabel};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityService;
pub use self::inventory::{Fulfilment, Inventory, InventoryError, MAX_UNITS};
pub use self::ledger_service::LedgerService;
pub use self::password::{
    DEFAULT_HASH_ITERATIONS, PasswordHash, PasswordHashError, PasswordHasher,
};
pub use self::records::{
    DonationRecord, POST_CONTENT_MAX, PostContent, RecordId, RecordValidationError,
    RequestDraft, RequestRecord,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Location, Role, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use saveablood::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("donors only"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
