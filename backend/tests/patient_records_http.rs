//! End-to-end checks over the in-memory clinic: sensitive patient fields are
//! stored only as ciphertext and refused requests leave the store untouched.

use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{NaiveDate, TimeDelta};
use clinic::domain::{
    AppointmentDraft, ErrorCode, PatientDraft, PatientId, PatientProfile, SensitiveDetails,
};
use clinic::domain::access::Role;
use clinic::domain::cipher::EncryptedField;
use clinic::domain::ports::{AppointmentRepository, PatientRepository, UserRepository};
use clinic::inbound::http::api_services;
use clinic::inbound::http::error::extractor_config;
use clinic::inbound::http::test_utils::{session_cookie, test_session_middleware};
use clinic::test_support::InMemoryClinic;
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const PASSWORD: &str = "correct horse battery";

#[fixture]
async fn seeded_clinic() -> InMemoryClinic {
    let clinic = InMemoryClinic::new();
    clinic
        .seed_user("root", Role::admin(), PASSWORD)
        .await
        .expect("seed admin");
    clinic
        .seed_user("desk", Role::user(), PASSWORD)
        .await
        .expect("seed user");
    clinic
}

async fn sign_in<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({"username": username, "password": PASSWORD}))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    session_cookie(&res)
}

fn new_patient() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "dateOfBirth": "1990-12-10",
        "contactNumber": "555-1234",
        "email": "ada@example.org",
        "medicalHistory": "asthma"
    })
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

macro_rules! clinic_app {
    ($clinic:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($clinic.http_state()))
                .configure(extractor_config)
                .service(
                    web::scope("/api/v1")
                        .wrap(test_session_middleware())
                        .configure(api_services),
                ),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn sensitive_fields_are_ciphertext_at_rest(#[future] seeded_clinic: InMemoryClinic) {
    let clinic = seeded_clinic.await;
    let app = clinic_app!(clinic);
    let cookie = sign_in(&app, "desk").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/patients")
        .cookie(cookie.clone())
        .set_json(new_patient())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["patientId"].as_i64().expect("patient id");

    let row = clinic
        .store
        .patients
        .find_by_id(PatientId::new(id).expect("positive id"))
        .await
        .expect("lookup succeeds")
        .expect("row stored");
    assert!(!contains(row.sealed.contact_number.as_bytes(), b"555-1234"));
    assert!(!contains(row.sealed.email.as_bytes(), b"ada@example.org"));
    assert_eq!(
        clinic
            .cipher
            .decrypt(Some(&row.sealed.contact_number))
            .expect("authentic"),
        Some("555-1234".to_owned())
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/patients/{id}"))
        .cookie(cookie)
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["contactNumber"], "555-1234");
    assert_eq!(fetched["medicalHistory"], "asthma");
}

#[rstest]
#[actix_web::test]
async fn omitted_sensitive_fields_keep_their_ciphertext(#[future] seeded_clinic: InMemoryClinic) {
    let clinic = seeded_clinic.await;
    let app = clinic_app!(clinic);
    let cookie = sign_in(&app, "desk").await;
    let req = test::TestRequest::post()
        .uri("/api/v1/patients")
        .cookie(cookie.clone())
        .set_json(new_patient())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = PatientId::new(created["patientId"].as_i64().expect("patient id")).expect("id");
    let before = clinic
        .store
        .patients
        .find_by_id(id)
        .await
        .expect("lookup")
        .expect("row");

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/patients/{id}"))
        .cookie(cookie)
        .set_json(json!({"lastName": "Byron"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let after = clinic
        .store
        .patients
        .find_by_id(id)
        .await
        .expect("lookup")
        .expect("row");
    assert_eq!(after.profile.last_name, "Byron");
    assert_eq!(after.sealed, before.sealed);
}

#[rstest]
#[actix_web::test]
async fn tampered_rows_surface_as_redacted_internal_errors(#[future] seeded_clinic: InMemoryClinic) {
    let clinic = seeded_clinic.await;
    let app = clinic_app!(clinic);
    let cookie = sign_in(&app, "root").await;
    let req = test::TestRequest::post()
        .uri("/api/v1/patients")
        .cookie(cookie.clone())
        .set_json(new_patient())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = PatientId::new(created["patientId"].as_i64().expect("patient id")).expect("id");

    let mut row = clinic
        .store
        .patients
        .find_by_id(id)
        .await
        .expect("lookup")
        .expect("row");
    let mut bytes = row.sealed.email.clone().into_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x80;
    row.sealed.email = EncryptedField::from_bytes(bytes);
    assert!(clinic.store.patients.replace(row).await.expect("replace"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/patients/{id}"))
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
    assert!(!body.to_string().contains("ada@example.org"));
}

#[rstest]
#[actix_web::test]
async fn user_role_on_admin_route_is_forbidden_without_mutation(
    #[future] seeded_clinic: InMemoryClinic,
) {
    let clinic = seeded_clinic.await;
    let app = clinic_app!(clinic);
    let cookie = sign_in(&app, "desk").await;
    let before = clinic.store.users.list().await.expect("list users");
    let admin = before
        .iter()
        .find(|user| user.username.as_ref() == "root")
        .expect("admin seeded");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{}", admin.id))
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "forbidden");

    let after = clinic.store.users.list().await.expect("list users");
    assert_eq!(after, before);
}

fn patient_draft() -> PatientDraft {
    PatientDraft {
        profile: PatientProfile {
            first_name: "Grace".to_owned(),
            last_name: "Hopper".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1986, 12, 9).expect("valid date"),
        },
        details: SensitiveDetails {
            contact_number: "555-0000".to_owned(),
            email: "grace@example.org".to_owned(),
            medical_history: None,
        },
    }
}

fn appointment_for(clinic: &InMemoryClinic, patient_id: PatientId) -> AppointmentDraft {
    AppointmentDraft {
        patient_id,
        appointment_date: clinic.clock.utc().naive_utc() + TimeDelta::days(1),
        notes: None,
    }
}

#[rstest]
#[actix_web::test]
async fn booking_waits_for_an_inflight_patient_deletion(#[future] seeded_clinic: InMemoryClinic) {
    let clinic = seeded_clinic.await;
    let state = clinic.http_state();
    let patient_id = state
        .patients
        .create(patient_draft())
        .await
        .expect("patient stored");

    let deletion = clinic.store.patient_references.exclusive().await;
    let booking = {
        let appointments = Arc::clone(&state.appointments);
        let draft = appointment_for(&clinic, patient_id);
        actix_web::rt::spawn(async move { appointments.create(draft).await })
    };
    actix_web::rt::time::sleep(Duration::from_millis(20)).await;
    assert!(!booking.is_finished(), "booking must wait for the deletion");

    clinic
        .store
        .patients
        .delete(patient_id)
        .await
        .expect("delete succeeds");
    drop(deletion);

    let err = booking
        .await
        .expect("booking task joins")
        .expect_err("patient no longer exists");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let orphans = clinic
        .store
        .appointments
        .list_for_patient(patient_id)
        .await
        .expect("lookup succeeds");
    assert!(orphans.is_empty());
}

#[rstest]
#[actix_web::test]
async fn deletion_waits_for_an_inflight_booking(#[future] seeded_clinic: InMemoryClinic) {
    let clinic = seeded_clinic.await;
    let state = clinic.http_state();
    let patient_id = state
        .patients
        .create(patient_draft())
        .await
        .expect("patient stored");

    let booking = clinic.store.patient_references.referencing().await;
    let deletion = {
        let patients = Arc::clone(&state.patients);
        actix_web::rt::spawn(async move { patients.delete(patient_id).await })
    };
    actix_web::rt::time::sleep(Duration::from_millis(20)).await;
    assert!(!deletion.is_finished(), "deletion must wait for the booking");

    clinic
        .store
        .appointments
        .insert(appointment_for(&clinic, patient_id), clinic.clock.utc())
        .await
        .expect("appointment stored");
    drop(booking);

    let err = deletion
        .await
        .expect("deletion task joins")
        .expect_err("patient is still referenced");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(
        clinic
            .store
            .patients
            .find_by_id(patient_id)
            .await
            .expect("lookup succeeds")
            .is_some()
    );
}
