//! HTTP inbound adapter exposing the SaveABlood REST endpoints.
//!
//! Handlers parse form and query input at the edge, enforce the session and
//! role gates, then call the driving ports held in [`state::HttpState`].

pub mod accounts;
pub mod banks;
pub mod dashboard;
pub mod donors;
pub mod error;
pub mod health;
pub mod ledger;
pub mod redirect;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
