//! Account handlers: registration, login, logout and the current identity.
//!
//! ```text
//! GET  /api/v1/login
//! POST /api/v1/register  username=ada&password=..&blood_type=O-&location=North&role=donor
//! POST /api/v1/login     username=ada&password=..
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, ErrorCode, LoginCredentials, Registration, RegistrationInput, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::redirect::{DASHBOARD_PATH, LOGIN_PATH, see_other};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_login_error, map_registration_error};

/// Form body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    /// One of `O-`, `O+`, `A-`, `A+`, `B-`, `B+`, `AB-`, `AB+`.
    pub blood_type: String,
    pub location: String,
    /// `donor` or `recipient`; fixed for the life of the account.
    pub role: String,
}

impl RegisterForm {
    fn as_input(&self) -> RegistrationInput<'_> {
        RegistrationInput {
            username: &self.username,
            password: &self.password,
            blood_type: &self.blood_type,
            location: &self.location,
            role: &self.role,
        }
    }
}

/// Form body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// A form a signed-out client can submit.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    pub method: &'static str,
    pub path: &'static str,
    pub content_type: &'static str,
    pub fields: Vec<&'static str>,
}

/// Body of `GET /api/v1/login` for callers without a session.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInOptions {
    pub login: FormDescriptor,
    pub register: FormDescriptor,
}

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

impl SignInOptions {
    fn new() -> Self {
        Self {
            login: FormDescriptor {
                method: "POST",
                path: LOGIN_PATH,
                content_type: FORM_CONTENT_TYPE,
                fields: vec!["username", "password"],
            },
            register: FormDescriptor {
                method: "POST",
                path: "/api/v1/register",
                content_type: FORM_CONTENT_TYPE,
                fields: vec!["username", "password", "blood_type", "location", "role"],
            },
        }
    }
}

/// Sign-in entry point; where logout and missing sessions redirect.
///
/// A live session goes straight on to the dashboard.
#[utoipa::path(
    get,
    path = "/api/v1/login",
    responses(
        (status = 200, description = "Not logged in; forms to log in or register", body = SignInOptions),
        (status = 303, description = "Already logged in; redirect to the dashboard"),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "signInOptions",
    security([])
)]
#[get("/login")]
pub async fn sign_in_options(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    match session.require_user(state.identity_query.as_ref()).await {
        Ok(_) => Ok(see_other(DASHBOARD_PATH)),
        Err(err) if err.code() == ErrorCode::LoginRequired => {
            Ok(HttpResponse::Ok().json(SignInOptions::new()))
        }
        Err(err) => Err(err),
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered; redirect to the dashboard",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid field", body = Error),
        (status = 409, description = "Username already exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from_input(form.as_input()).map_err(map_registration_error)?;
    let user = state.identity.register(&registration).await?;
    session.persist_user(user.id())?;
    Ok(see_other(DASHBOARD_PATH))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in; redirect to the dashboard",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from_parts(&form.username, &form.password).map_err(map_login_error)?;
    let user = state.identity.authenticate(&credentials).await?;
    session.persist_user(user.id())?;
    Ok(see_other(DASHBOARD_PATH))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 303, description = "Session cleared; redirect to login")),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Ok(Some(user_id)) = session.user_id() {
        info!(%user_id, "user logged out");
    }
    session.clear();
    see_other(LOGIN_PATH)
}

/// The signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current identity", body = User),
        (status = 303, description = "Not logged in; redirect to login", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user = session.require_user(state.identity_query.as_ref()).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BloodType, Role};
    use crate::inbound::http::test_utils::{
        MockPorts, session_cookie, test_session_middleware, user,
    };
    use crate::inbound::http::validation::form_config;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::Value;

    fn app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .app_data(state)
            .app_data(form_config())
            .service(
                web::scope("/api/v1")
                    .service(sign_in_options)
                    .service(register)
                    .service(login)
                    .service(logout)
                    .service(current_user),
            )
    }

    fn location_of<B>(res: &actix_web::dev::ServiceResponse<B>) -> Option<&str> {
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[actix_web::test]
    async fn registration_signs_in_and_redirects_to_dashboard() {
        let ada = user("ada", BloodType::ONegative, "North", Role::Donor);
        let mut ports = MockPorts::default().with_session_user(&ada);
        let registered = ada.clone();
        ports
            .identity
            .expect_register()
            .withf(|registration| {
                registration.username().as_ref() == "ada"
                    && registration.blood_type() == BloodType::ONegative
                    && registration.role() == Role::Donor
            })
            .times(1)
            .return_once(move |_| Ok(registered));
        let app = test::init_service(app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_form([
                    ("username", "ada"),
                    ("password", "hunter2"),
                    ("blood_type", "O-"),
                    ("location", "North"),
                    ("role", "donor"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_of(&res), Some(DASHBOARD_PATH));
        let cookie = session_cookie(&res);

        let me = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        let body: Value = test::read_body_json(me).await;
        assert_eq!(body["username"], "ada");
        assert_eq!(body["bloodType"], "O-");
        assert_eq!(body["role"], "donor");
    }

    #[actix_web::test]
    async fn registration_with_unknown_type_label_is_rejected_before_the_port() {
        let mut ports = MockPorts::default();
        ports.identity.expect_register().never();
        let app = test::init_service(app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_form([
                    ("username", "ada"),
                    ("password", "hunter2"),
                    ("blood_type", "ZZ"),
                    ("location", "North"),
                    ("role", "donor"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["code"], "invalid_type_label");
    }

    #[actix_web::test]
    async fn duplicate_username_is_a_conflict() {
        let mut ports = MockPorts::default();
        ports
            .identity
            .expect_register()
            .times(1)
            .return_once(|_| Err(Error::conflict("username already exists")));
        let app = test::init_service(app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_form([
                    ("username", "ada"),
                    ("password", "hunter2"),
                    ("blood_type", "A+"),
                    ("location", "North"),
                    ("role", "recipient"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert!(res.response().cookies().next().is_none());
    }

    #[actix_web::test]
    async fn rejected_login_is_unauthorised() {
        let mut ports = MockPorts::default();
        ports
            .identity
            .expect_authenticate()
            .withf(|credentials| credentials.username() == "ada")
            .times(1)
            .return_once(|_| Err(Error::unauthorized("invalid username or password")));
        let app = test::init_service(app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_form([("username", " ada "), ("password", "wrong")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Error = test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::Unauthorized);
    }

    #[actix_web::test]
    async fn blank_login_fields_never_reach_the_port() {
        let mut ports = MockPorts::default();
        ports.identity.expect_authenticate().never();
        let app = test::init_service(app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_form([("username", "ada"), ("password", "")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "password");
    }

    #[actix_web::test]
    async fn missing_form_fields_are_invalid_requests() {
        let app = test::init_service(app(MockPorts::default().into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_form([("username", "ada")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "malformed_form");
    }

    #[actix_web::test]
    async fn logout_clears_the_session() {
        let ada = user("ada", BloodType::ONegative, "North", Role::Donor);
        let mut ports = MockPorts::default().with_session_user(&ada);
        let authenticated = ada.clone();
        ports
            .identity
            .expect_authenticate()
            .return_once(move |_| Ok(authenticated));
        let app = test::init_service(app(ports.into_state())).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_form([("username", "ada"), ("password", "hunter2")])
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&login_res);

        let logout_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_of(&logout_res), Some(LOGIN_PATH));
        let cleared = session_cookie(&logout_res);

        let me = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/me").cookie(cleared).to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_of(&me), Some(LOGIN_PATH));
    }

    #[actix_web::test]
    async fn login_page_lists_the_forms_for_anonymous_callers() {
        let app = test::init_service(app(MockPorts::default().into_state())).await;

        let res = test::call_service(&app, test::TestRequest::get().uri(LOGIN_PATH).to_request())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["login"]["method"], "POST");
        assert_eq!(body["login"]["path"], LOGIN_PATH);
        assert_eq!(body["login"]["contentType"], FORM_CONTENT_TYPE);
        assert_eq!(body["register"]["path"], "/api/v1/register");
        assert_eq!(body["register"]["fields"][2], "blood_type");
    }

    #[actix_web::test]
    async fn login_page_sends_signed_in_callers_to_the_dashboard() {
        let ada = user("ada", BloodType::ONegative, "North", Role::Donor);
        let mut ports = MockPorts::default().with_session_user(&ada);
        let authenticated = ada.clone();
        ports
            .identity
            .expect_authenticate()
            .return_once(move |_| Ok(authenticated));
        let app = test::init_service(app(ports.into_state())).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(LOGIN_PATH)
                .set_form([("username", "ada"), ("password", "hunter2")])
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&login_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(LOGIN_PATH).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location_of(&res), Some(DASHBOARD_PATH));
    }
}
