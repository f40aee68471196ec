//! OpenAPI documentation for the clinic REST API.
//!
//! [`ApiDoc`] registers every `/api/v1` handler and both health probes.
//! Request and response schemas are collected from the handler annotations.
//! The document is served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, TreatmentStatus};
use crate::inbound::http::{
    appointments, auth, dashboard, health, inventory, patients, treatment_plans, users,
};

/// Adds the session cookie security scheme.
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
                "Encrypted session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Clinic backend API",
        description = "Session-authenticated clinic records with field-level encryption of patient data."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        auth::login,
        auth::logout,
        auth::current_session,
        users::create_user,
        users::list_users,
        users::update_user,
        users::delete_user,
        patients::list_patients,
        patients::create_patient,
        patients::get_patient,
        patients::update_patient,
        patients::delete_patient,
        patients::search_patients,
        appointments::list_appointments,
        appointments::create_appointment,
        appointments::get_appointment,
        appointments::update_appointment,
        appointments::delete_appointment,
        inventory::list_inventory,
        inventory::create_inventory_item,
        inventory::get_inventory_item,
        inventory::update_inventory_item,
        inventory::delete_inventory_item,
        treatment_plans::list_treatment_plans,
        treatment_plans::list_patient_treatment_plans,
        treatment_plans::create_treatment_plan,
        treatment_plans::get_treatment_plan,
        treatment_plans::update_treatment_plan,
        treatment_plans::delete_treatment_plan,
        dashboard::dashboard,
        health::ready,
        health::live,
    ),
    components(schemas(Error, ErrorCode, TreatmentStatus)),
    tags(
        (name = "auth", description = "Login, logout and session inspection"),
        (name = "users", description = "Administrator-only account management"),
        (name = "patients", description = "Patient records; contact and medical fields are encrypted at rest"),
        (name = "appointments", description = "Appointment booking"),
        (name = "inventory", description = "Stock levels and reorder thresholds"),
        (name = "treatment-plans", description = "Treatment plans per patient"),
        (name = "dashboard", description = "Summary for the signed-in caller"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
