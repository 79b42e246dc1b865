//! Ledger handlers: donors post donations, recipients request blood.
//!
//! ```text
//! POST /api/v1/donations  blood_bank_id=<uuid>&content=Gave+at+lunch
//! POST /api/v1/requests   blood_type_needed=AB%2B&blood_bank_id=<uuid>
//! ```
//!
//! Both end in `303 See Other` to the dashboard whatever the ledger decided;
//! the outcome is visible there as a donation post or a request record.
//! The session is checked before the body, so a signed-out browser is sent
//! to the login page even when its form is incomplete.

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::DonationOutcome;
use crate::domain::{Error, PostContent, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::redirect::{DASHBOARD_PATH, see_other};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    BLOOD_BANK_ID, BLOOD_TYPE_NEEDED, extracted, map_content_error, parse_bank_id,
    parse_blood_type,
};

/// Form body for `POST /api/v1/donations`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DonationForm {
    pub blood_bank_id: String,
    pub content: String,
}

/// Form body for `POST /api/v1/requests`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BloodRequestForm {
    pub blood_type_needed: String,
    pub blood_bank_id: String,
}

/// Record a donation of one unit of the donor's own blood type.
#[utoipa::path(
    post,
    path = "/api/v1/donations",
    request_body(content = DonationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Processed, or not logged in; redirect to the dashboard or login"),
        (status = 400, description = "Invalid field", body = Error),
        (status = 403, description = "Caller is not a donor", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ledger"],
    operation_id = "postDonation"
)]
#[post("/donations")]
pub async fn post_donation(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: Result<web::Form<DonationForm>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let donor = session
        .require_role(state.identity_query.as_ref(), Role::Donor)
        .await?;
    let form = extracted(form)?;
    let bank_id = parse_bank_id(BLOOD_BANK_ID, &form.blood_bank_id)?;
    let content = PostContent::new(&form.content).map_err(map_content_error)?;

    match state.ledger.post_donation(&donor, bank_id, content).await? {
        DonationOutcome::Recorded(_) | DonationOutcome::BankNotFound => {
            Ok(see_other(DASHBOARD_PATH))
        }
    }
}

/// Request one unit of the given type from a bank.
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body(content = BloodRequestForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Recorded, or not logged in; redirect to the dashboard or login"),
        (status = 400, description = "Invalid field", body = Error),
        (status = 403, description = "Caller is not a recipient", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ledger"],
    operation_id = "requestBlood"
)]
#[post("/requests")]
pub async fn request_blood(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: Result<web::Form<BloodRequestForm>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let requester = session
        .require_role(state.identity_query.as_ref(), Role::Recipient)
        .await?;
    let form = extracted(form)?;
    let blood_type = parse_blood_type(BLOOD_TYPE_NEEDED, &form.blood_type_needed)?;
    let bank_id = parse_bank_id(BLOOD_BANK_ID, &form.blood_bank_id)?;

    state
        .ledger
        .request_blood(&requester, bank_id, blood_type)
        .await?;
    Ok(see_other(DASHBOARD_PATH))
}
