//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie holds only the user's id. Role, blood type and location are
//! reloaded through [`IdentityQuery`] on every request so a stale or forged
//! cookie can never widen what a caller may do.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::IdentityQuery;
use crate::domain::{Error, Role, User, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id, rotating the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop everything stored in the session.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A value that is not a UUID is treated as no session at all.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(id.and_then(|raw| match UserId::new(&raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                None
            }
        }))
    }

    /// Require an authenticated user id or fail with `login_required`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?.ok_or_else(Error::login_required)
    }

    /// Resolve the session to a stored user.
    ///
    /// A cookie naming a user that no longer exists is cleared and treated
    /// as logged out.
    pub async fn require_user(&self, identities: &dyn IdentityQuery) -> Result<User, Error> {
        let id = self.require_user_id()?;
        match identities.current_user(&id).await? {
            Some(user) => Ok(user),
            None => {
                warn!(user_id = %id, "session references unknown user");
                self.clear();
                Err(Error::login_required())
            }
        }
    }

    /// Like [`Self::require_user`] but also enforces the caller's role.
    pub async fn require_role(
        &self,
        identities: &dyn IdentityQuery,
        role: Role,
    ) -> Result<User, Error> {
        let user = self.require_user(identities).await?;
        if user.role() == role {
            Ok(user)
        } else {
            Err(Error::forbidden(format!("only {} accounts may do this", role.as_str())))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
