//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::AppSettings;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use saveablood::Trace;
#[cfg(debug_assertions)]
use saveablood::doc::ApiDoc;
use saveablood::inbound::http::accounts::{
    current_user, login, logout, register, sign_in_options,
};
use saveablood::inbound::http::banks::{blood_bank_inventory, list_blood_banks};
use saveablood::inbound::http::dashboard::dashboard;
use saveablood::inbound::http::donors::search_donors;
use saveablood::inbound::http::health::{HealthState, live, ready};
use saveablood::inbound::http::ledger::{post_donation, request_blood};
use saveablood::inbound::http::state::HttpState;
use saveablood::inbound::http::validation::{form_config, query_config};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
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
        .service(search_donors);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(form_config())
        .app_data(query_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Errors raised while assembling the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to prepare ledger state: {0}")]
    State(#[from] saveablood::domain::ports::BloodBankRepositoryError),
    #[error("failed to bind HTTP listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Readiness is only reported once storage is wired and the listener is
/// bound.
///
/// # Errors
/// Returns [`ServerError`] when seeding the default banks or binding the
/// socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> Result<Server, ServerError> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config).await?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
