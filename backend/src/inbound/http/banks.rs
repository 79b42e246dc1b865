//! Blood bank read handlers.
//!
//! ```text
//! GET /api/v1/blood-banks
//! GET /api/v1/blood-banks/{bank_id}/inventory
//! ```

use actix_web::{get, web};

use crate::domain::{BloodBank, Error, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_bank_id};

const BANK_ID_PARAM: FieldName = FieldName::new("bank_id");

/// Every bank with its current inventory.
#[utoipa::path(
    get,
    path = "/api/v1/blood-banks",
    responses(
        (status = 200, description = "Banks ordered by name", body = [BloodBank]),
        (status = 303, description = "Not logged in; redirect to login", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["banks"],
    operation_id = "listBloodBanks"
)]
#[get("/blood-banks")]
pub async fn list_blood_banks(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<BloodBank>>> {
    session.require_user(state.identity_query.as_ref()).await?;
    let banks = state.ledger_query.list_banks().await?;
    Ok(web::Json(banks))
}

/// Unit counts for all eight types at one bank.
#[utoipa::path(
    get,
    path = "/api/v1/blood-banks/{bank_id}/inventory",
    params(("bank_id" = String, Path, description = "Blood bank UUID")),
    responses(
        (status = 200, description = "Bank with inventory snapshot", body = BloodBank),
        (status = 303, description = "Not logged in; redirect to login", body = Error),
        (status = 400, description = "Malformed bank id", body = Error),
        (status = 403, description = "Caller is not a recipient", body = Error),
        (status = 404, description = "No such bank", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["banks"],
    operation_id = "bloodBankInventory"
)]
#[get("/blood-banks/{bank_id}/inventory")]
pub async fn blood_bank_inventory(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<BloodBank>> {
    session
        .require_role(state.identity_query.as_ref(), Role::Recipient)
        .await?;
    let bank_id = parse_bank_id(BANK_ID_PARAM, &path)?;
    let bank = state.ledger_query.inventory_snapshot(bank_id).await?;
    Ok(web::Json(bank))
}
