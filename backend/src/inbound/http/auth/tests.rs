//! Tests for authentication handlers.

use super::*;
use crate::domain::access::Role;
use crate::domain::{ErrorCode, UserId, Username};
use crate::inbound::http::test_utils::{MockPorts, session_cookie, sign_in_request, test_app};
use actix_web::http::StatusCode;
use actix_web::test;
use mockall::predicate::always;
use rstest::rstest;
use serde_json::{Value, json};

fn nurse() -> Identity {
    Identity::new(
        UserId::new(3).expect("fixture id"),
        Role::user(),
        Username::new("nurse").expect("fixture username"),
    )
}

#[rstest]
#[actix_web::test]
async fn login_persists_identity_for_later_requests() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .withf(|creds| creds.username() == "nurse" && creds.password() == "pw")
        .times(1)
        .returning(|_| Ok(nurse()));
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": " nurse ", "password": "pw"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);
    let body: LoginResponse = test::read_body_json(res).await;
    assert_eq!(body.message, "Login successful");
    assert_eq!(body.user.role, "user");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let current: SessionUser = test::read_body_json(res).await;
    assert_eq!((current.id, current.username.as_str()), (3, "nurse"));
}

#[rstest]
#[case::blank_username("  ", "pw", "username")]
#[case::blank_password("nurse", "", "password")]
#[actix_web::test]
async fn login_rejects_blank_credentials_before_the_port(
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let mut ports = MockPorts::default();
    ports.login.expect_authenticate().times(0);
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": username, "password": password}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn bad_credentials_do_not_open_a_session() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .with(always())
        .returning(|_| Err(Error::unauthorized("Invalid credentials")));
    let app = test::init_service(test_app(ports)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": "nurse", "password": "wrong"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.response().cookies().all(|c| c.name() != "session"));
    let body: Error = test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[actix_web::test]
async fn logout_always_succeeds_and_ends_the_session() {
    let app = test::init_service(test_app(MockPorts::default())).await;

    let anonymous = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/v1/logout").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::OK);

    let signed_in = test::call_service(&app, sign_in_request("admin", 1).to_request()).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(session_cookie(&signed_in))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = session_cookie(&res);
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/session")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
