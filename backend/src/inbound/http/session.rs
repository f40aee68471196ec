//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The identity triple (`user_id`, `role`, `username`) is written together at
//! login and read back together; a session missing any part, or holding a
//! value that no longer validates, is treated as anonymous.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::access::{Identity, Role};
use crate::domain::{Error, UserId, Username};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";
pub(crate) const USERNAME_KEY: &str = "username";

/// Newtype wrapper that exposes identity-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

fn read_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

fn write_failed(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the full identity, replacing whatever the session held.
    pub fn persist_identity(&self, identity: &Identity) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, identity.user_id().get())
            .map_err(write_failed)?;
        self.0
            .insert(ROLE_KEY, identity.role().as_str())
            .map_err(write_failed)?;
        self.0
            .insert(USERNAME_KEY, identity.username().as_ref())
            .map_err(write_failed)
    }

    /// The caller's identity, if the session holds a complete one.
    pub fn identity(&self) -> Result<Option<Identity>, Error> {
        let user_id = self.0.get::<i64>(USER_ID_KEY).map_err(read_failed)?;
        let role = self.0.get::<String>(ROLE_KEY).map_err(read_failed)?;
        let username = self.0.get::<String>(USERNAME_KEY).map_err(read_failed)?;
        let (Some(user_id), Some(role), Some(username)) = (user_id, role, username) else {
            return Ok(None);
        };
        match restore(user_id, role, &username) {
            Ok(identity) => Ok(Some(identity)),
            Err(error) => {
                warn!(%error, "discarding invalid identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Drop every session key and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

fn restore(user_id: i64, role: String, username: &str) -> Result<Identity, Error> {
    let user_id = UserId::new(user_id)?;
    let role = Role::new(role)?;
    let username = Username::new(username)?;
    Ok(Identity::new(user_id, role, username))
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
