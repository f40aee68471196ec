//! HTTP inbound adapter exposing the clinic REST API.
//!
//! Every `/api/v1` handler is registered by [`api_services`]; health probes
//! are mounted separately at the root so they bypass sessions.

use actix_web::web;

pub mod appointments;
pub mod auth;
pub mod cache_control;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod health;
pub mod inventory;
pub mod patients;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod treatment_plans;
pub mod users;

pub use error::ApiResult;

/// Register every `/api/v1` route on `cfg`.
pub fn api_services(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(auth::current_session)
        .service(users::create_user)
        .service(users::list_users)
        .service(users::update_user)
        .service(users::delete_user)
        .service(patients::search_patients)
        .service(patients::list_patients)
        .service(patients::create_patient)
        .service(patients::get_patient)
        .service(patients::update_patient)
        .service(patients::delete_patient)
        .service(appointments::list_appointments)
        .service(appointments::create_appointment)
        .service(appointments::get_appointment)
        .service(appointments::update_appointment)
        .service(appointments::delete_appointment)
        .service(inventory::list_inventory)
        .service(inventory::create_inventory_item)
        .service(inventory::get_inventory_item)
        .service(inventory::update_inventory_item)
        .service(inventory::delete_inventory_item)
        .service(treatment_plans::list_treatment_plans)
        .service(treatment_plans::list_patient_treatment_plans)
        .service(treatment_plans::create_treatment_plan)
        .service(treatment_plans::get_treatment_plan)
        .service(treatment_plans::update_treatment_plan)
        .service(treatment_plans::delete_treatment_plan)
        .service(dashboard::dashboard);
}
