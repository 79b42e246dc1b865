//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health probes, the
//! domain schemas they return, and the session cookie security scheme. The
//! generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::Dashboard;
use crate::domain::{
    BloodBank, DonationRecord, Error, ErrorCode, RequestRecord, Role, User,
};
use crate::inbound::http::accounts::{FormDescriptor, LoginForm, RegisterForm, SignInOptions};
use crate::inbound::http::ledger::{BloodRequestForm, DonationForm};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "SaveABlood API",
        description = "Blood bank inventory ledger: donors post donations, recipients request units."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::sign_in_options,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::banks::list_blood_banks,
        crate::inbound::http::banks::blood_bank_inventory,
        crate::inbound::http::ledger::post_donation,
        crate::inbound::http::ledger::request_blood,
        crate::inbound::http::donors::search_donors,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Role,
        BloodBank,
        DonationRecord,
        RequestRecord,
        Dashboard,
        RegisterForm,
        LoginForm,
        SignInOptions,
        FormDescriptor,
        DonationForm,
        BloodRequestForm,
    )),
    tags(
        (name = "accounts", description = "Registration, login and the current identity"),
        (name = "ledger", description = "Donations, requests and the dashboard"),
        (name = "banks", description = "Blood banks and their inventory"),
        (name = "donors", description = "Donor search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
