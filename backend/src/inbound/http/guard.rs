//! Request guards enforcing [`AccessPolicy`] before handler bodies run.
//!
//! Handlers declare their policy in the signature by taking a
//! [`Guarded<P>`] argument. Extraction reads the session identity and
//! evaluates `P::policy()`; a failure short-circuits the request with `401`
//! or `403` so the handler (and every repository behind it) never runs.
//!
//! ```ignore
//! async fn delete_user(guard: Guarded<AdminOnly>, ...) -> ApiResult<HttpResponse>
//! ```

use std::marker::PhantomData;

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::Error;
use crate::domain::access::{AccessPolicy, Identity, RoleSet};

use super::session::SessionContext;

/// Compile-time selection of an access policy.
pub trait RolePolicy {
    /// The guard chain to evaluate.
    fn policy() -> AccessPolicy;
}

/// Any authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct SignedIn;

/// Clinic staff: administrators and regular users.
#[derive(Debug, Clone, Copy)]
pub struct Staff;

/// Administrators only.
#[derive(Debug, Clone, Copy)]
pub struct AdminOnly;

impl RolePolicy for SignedIn {
    fn policy() -> AccessPolicy {
        AccessPolicy::authenticated()
    }
}

impl RolePolicy for Staff {
    fn policy() -> AccessPolicy {
        AccessPolicy::roles(RoleSet::staff())
    }
}

impl RolePolicy for AdminOnly {
    fn policy() -> AccessPolicy {
        AccessPolicy::roles(RoleSet::admin_only())
    }
}

/// Identity admitted by policy `P`.
#[derive(Debug, Clone)]
pub struct Guarded<P> {
    identity: Identity,
    policy: PhantomData<P>,
}

impl<P> Guarded<P> {
    /// The admitted caller.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Consume the guard, keeping the admitted caller.
    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

fn admit<P: RolePolicy>(session: &SessionContext) -> Result<Guarded<P>, Error> {
    let identity = session.identity()?;
    let admitted = P::policy().evaluate(identity.as_ref()).map_err(|denied| {
        debug!(reason = %denied, "request rejected by access guard");
        Error::from(denied)
    })?;
    Ok(Guarded {
        identity: admitted.clone(),
        policy: PhantomData,
    })
}

impl<P: RolePolicy + 'static> FromRequest for Guarded<P> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = session.await?;
            admit::<P>(&session).map_err(actix_web::Error::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::Role;
    use crate::domain::{ErrorCode, UserId, Username};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Calls(AtomicUsize);

    async fn sign_in(session: SessionContext, role: web::Path<String>) -> Result<HttpResponse, Error> {
        let identity = Identity::new(
            UserId::new(7).expect("fixture id"),
            Role::new(role.into_inner())?,
            Username::new("caller").expect("fixture username"),
        );
        session.persist_identity(&identity)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn admin_action(guard: Guarded<AdminOnly>, calls: web::Data<Calls>) -> HttpResponse {
        calls.0.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().body(guard.identity().username().to_string())
    }

    async fn staff_action(_guard: Guarded<Staff>) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn any_action(guard: Guarded<SignedIn>) -> HttpResponse {
        HttpResponse::Ok().body(guard.into_identity().role().to_string())
    }

    async fn call(role: Option<&str>, uri: &str) -> (StatusCode, usize, Option<Error>) {
        let calls = web::Data::new(Calls::default());
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(calls.clone())
                .route("/sign-in/{role}", web::get().to(sign_in))
                .route("/admin", web::get().to(admin_action))
                .route("/staff", web::get().to(staff_action))
                .route("/any", web::get().to(any_action)),
        )
        .await;
        let mut request = test::TestRequest::get().uri(uri);
        if let Some(role) = role {
            let res = test::call_service(
                &app,
                test::TestRequest::get()
                    .uri(&format!("/sign-in/{role}"))
                    .to_request(),
            )
            .await;
            request = request.cookie(session_cookie(&res));
        }
        let res = test::call_service(&app, request.to_request()).await;
        let status = res.status();
        let error = if status.is_success() {
            None
        } else {
            Some(test::read_body_json::<Error, _>(res).await)
        };
        (status, calls.0.load(Ordering::SeqCst), error)
    }

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some("user"), StatusCode::FORBIDDEN)]
    #[case(Some("Admin"), StatusCode::FORBIDDEN)]
    #[case(Some("admin"), StatusCode::OK)]
    #[actix_web::test]
    async fn admin_only_gate(#[case] role: Option<&str>, #[case] expected: StatusCode) {
        let (status, calls, _) = call(role, "/admin").await;
        assert_eq!(status, expected);
        assert_eq!(calls, usize::from(expected == StatusCode::OK));
    }

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some("user"), StatusCode::OK)]
    #[case(Some("admin"), StatusCode::OK)]
    #[case(Some("auditor"), StatusCode::FORBIDDEN)]
    #[actix_web::test]
    async fn staff_gate(#[case] role: Option<&str>, #[case] expected: StatusCode) {
        let (status, _, _) = call(role, "/staff").await;
        assert_eq!(status, expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn signed_in_admits_any_role() {
        let (status, _, _) = call(Some("auditor"), "/any").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn rejections_use_the_error_envelope() {
        let (_, _, error) = call(None, "/staff").await;
        let error = error.expect("error body");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "login required");

        let (_, _, error) = call(Some("user"), "/admin").await;
        assert_eq!(error.expect("error body").code(), ErrorCode::Forbidden);
    }
}
