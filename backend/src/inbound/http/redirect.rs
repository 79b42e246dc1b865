//! `303 See Other` responses that end form submissions.
//!
//! Every target is a route this service answers, so a browser following
//! the `Location` header never lands on a 404.

use actix_web::HttpResponse;
use actix_web::http::header;

/// Landing page after registering, logging in or submitting to the ledger.
pub const DASHBOARD_PATH: &str = "/api/v1/dashboard";
/// Sign-in entry point; also where logout and missing sessions lead.
pub const LOGIN_PATH: &str = "/api/v1/login";

pub(crate) fn see_other(location: &'static str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
