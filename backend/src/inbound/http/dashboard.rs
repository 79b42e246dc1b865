//! `GET /api/v1/dashboard`: the signed-in user's view of the ledger.

use actix_web::{get, web};

use crate::domain::Error;
use crate::domain::ports::Dashboard;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Every donation post plus the requests recorded at the caller's location,
/// newest first.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard read model", body = Dashboard),
        (status = 303, description = "Not logged in; redirect to login", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["ledger"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Dashboard>> {
    let viewer = session.require_user(state.identity_query.as_ref()).await?;
    let dashboard = state.ledger_query.dashboard(&viewer).await?;
    Ok(web::Json(dashboard))
}
