//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, Resource, web};

use crate::domain::ports::{
    MockIdentityCommand, MockIdentityQuery, MockLedgerCommand, MockLedgerQuery,
};
use crate::domain::{BloodType, Error, Location, Role, User, UserId, Username};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub const SESSION_COOKIE: &str = "session";

/// Path of the route added by [`login_as`].
pub const TEST_LOGIN_PATH: &str = "/test-login";

/// Cookie session middleware with a throwaway key and `Secure` disabled so
/// plain-HTTP test requests carry the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by `response`.
///
/// # Panics
/// Panics when the response did not set one.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Route that stores `user_id` in the session, standing in for a real login.
pub fn login_as(user_id: UserId) -> Resource {
    web::resource(TEST_LOGIN_PATH).route(web::get().to(move |session: SessionContext| async move {
        session.persist_user(&user_id)?;
        Ok::<_, Error>(HttpResponse::Ok().finish())
    }))
}

pub fn user(name: &str, blood_type: BloodType, location: &str, role: Role) -> User {
    User::new(
        UserId::random(),
        Username::new(name).expect("username"),
        blood_type,
        Location::new(location).expect("location"),
        role,
    )
}

/// Mocked driving ports; set expectations then call [`MockPorts::into_state`].
pub struct MockPorts {
    pub identity: MockIdentityCommand,
    pub identity_query: MockIdentityQuery,
    pub ledger: MockLedgerCommand,
    pub ledger_query: MockLedgerQuery,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            identity: MockIdentityCommand::new(),
            identity_query: MockIdentityQuery::new(),
            ledger: MockLedgerCommand::new(),
            ledger_query: MockLedgerQuery::new(),
        }
    }
}

impl MockPorts {
    /// Resolve session lookups to `user`.
    pub fn with_session_user(mut self, user: &User) -> Self {
        let user = user.clone();
        self.identity_query
            .expect_current_user()
            .returning(move |id| Ok((id == user.id()).then(|| user.clone())));
        self
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.identity),
            Arc::new(self.identity_query),
            Arc::new(self.ledger),
            Arc::new(self.ledger_query),
        ))
    }
}

/// Call the [`login_as`] route on an initialised test service and return the
/// resulting session cookie.
macro_rules! sign_in {
    ($app:expr) => {{
        let res = actix_web::test::call_service(
            $app,
            actix_web::test::TestRequest::get()
                .uri($crate::inbound::http::test_utils::TEST_LOGIN_PATH)
                .to_request(),
        )
        .await;
        $crate::inbound::http::test_utils::session_cookie(&res)
    }};
}

pub(crate) use sign_in;
