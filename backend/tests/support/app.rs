//! Full application harness backed by the in-memory adapters.
//!
//! Mirrors the production wiring (session cookie scope, extractor configs,
//! `Trace` middleware) so the suites exercise real services end to end
//! without a database.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::DefaultClock;

use saveablood::Trace;
use saveablood::domain::{
    BloodBank, BloodBankId, BloodType, IdentityService, Inventory, LedgerService, Location,
    PasswordHasher,
};
use saveablood::inbound::http::accounts::{
    current_user, login, logout, register, sign_in_options,
};
use saveablood::inbound::http::banks::{blood_bank_inventory, list_blood_banks};
use saveablood::inbound::http::dashboard::dashboard;
use saveablood::inbound::http::donors::search_donors;
use saveablood::inbound::http::ledger::{post_donation, request_blood};
use saveablood::inbound::http::state::HttpState;
use saveablood::inbound::http::validation::{form_config, query_config};
use saveablood::outbound::memory::{InMemoryBloodBankRepository, InMemoryUserRepository};

pub const SESSION_COOKIE: &str = "session";

/// Handler state over fresh in-memory stores holding `banks`.
pub fn state_with_banks(banks: impl IntoIterator<Item = BloodBank>) -> web::Data<HttpState> {
    let users = Arc::new(InMemoryUserRepository::new());
    let identity = Arc::new(IdentityService::new(
        users,
        PasswordHasher::new(1).expect("hasher"),
    ));
    let banks = InMemoryBloodBankRepository::with_banks(banks);
    let records = banks.records();
    let ledger = Arc::new(LedgerService::new(
        Arc::new(banks),
        Arc::new(records),
        Arc::new(DefaultClock),
    ));
    web::Data::new(HttpState::new(
        identity.clone(),
        identity,
        ledger.clone(),
        ledger,
    ))
}

pub fn bank(name: &str, location: &str, counts: &[(BloodType, u32)]) -> BloodBank {
    BloodBank::new(
        BloodBankId::random(),
        name,
        Location::new(location).expect("location"),
        Inventory::from_counts(counts.iter().copied()).expect("inventory"),
    )
}

pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(state)
        .app_data(form_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(session)
                .service(sign_in_options)
                .service(register)
                .service(login)
                .service(logout)
                .service(current_user)
                .service(dashboard)
                .service(list_blood_banks)
                .service(blood_bank_inventory)
                .service(post_donation)
                .service(request_blood)
                .service(search_donors),
        )
}

pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Register an account through the API and return its session cookie.
pub async fn sign_up<S, B>(
    app: &S,
    username: &str,
    blood_type: &str,
    location: &str,
    role: &str,
) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_form([
                ("username", username),
                ("password", "correct horse"),
                ("blood_type", blood_type),
                ("location", location),
                ("role", role),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "register {username}");
    session_cookie(&res)
}

/// Submit a form as the holder of `cookie` and return the status.
pub async fn post_form<S, B>(
    app: &S,
    cookie: &Cookie<'static>,
    uri: &str,
    form: &[(&str, &str)],
) -> StatusCode
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    test::call_service(
        app,
        test::TestRequest::post()
            .uri(uri)
            .cookie(cookie.clone())
            .set_form(form)
            .to_request(),
    )
    .await
    .status()
}

/// GET `uri` as the holder of `cookie` and decode the JSON body.
pub async fn get_json<S, B>(app: &S, cookie: &Cookie<'static>, uri: &str) -> serde_json::Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "GET {uri}");
    test::read_body_json(res).await
}
