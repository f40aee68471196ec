//! Patient record handlers. Staff only.
//!
//! Bodies carry plaintext; sealing happens behind the `PatientRecords` port.
//! Responses that include decrypted fields are marked `no-store`.
//!
//! ```text
//! GET    /api/v1/patients
//! POST   /api/v1/patients
//! GET    /api/v1/patients/{id}
//! PUT    /api/v1/patients/{id}
//! DELETE /api/v1/patients/{id}
//! POST   /api/v1/patients/search {"patientName":"ada"}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::patient::{contact_number, medical_history, patient_email, patient_name};
use crate::domain::{
    Error, Patient, PatientChanges, PatientDraft, PatientId, PatientOverview, PatientProfile,
    SensitiveDetails, ValidationError, ValidationReason,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::appointments::AppointmentResponse;
use crate::inbound::http::auth::MessageResponse;
use crate::inbound::http::cache_control::no_store_header;
use crate::inbound::http::guard::{Guarded, Staff};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::treatment_plans::TreatmentPlanResponse;

/// New patient body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub contact_number: String,
    pub email: String,
    pub medical_history: Option<String>,
}

impl TryFrom<CreatePatientRequest> for PatientDraft {
    type Error = ValidationError;

    fn try_from(value: CreatePatientRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            profile: PatientProfile {
                first_name: patient_name("firstName", &value.first_name)?,
                last_name: patient_name("lastName", &value.last_name)?,
                date_of_birth: value.date_of_birth,
            },
            details: SensitiveDetails {
                contact_number: contact_number(&value.contact_number)?,
                email: patient_email(&value.email)?,
                medical_history: medical_history(value.medical_history.as_deref())?,
            },
        })
    }
}

/// Partial patient update; omitted fields keep their stored values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub medical_history: Option<String>,
}

impl TryFrom<UpdatePatientRequest> for PatientChanges {
    type Error = ValidationError;

    fn try_from(value: UpdatePatientRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: value
                .first_name
                .map(|raw| patient_name("firstName", &raw))
                .transpose()?,
            last_name: value
                .last_name
                .map(|raw| patient_name("lastName", &raw))
                .transpose()?,
            date_of_birth: value.date_of_birth,
            contact_number: value
                .contact_number
                .map(|raw| contact_number(&raw))
                .transpose()?,
            email: value.email.map(|raw| patient_email(&raw)).transpose()?,
            medical_history: medical_history(value.medical_history.as_deref())?,
        })
    }
}

/// Name search body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSearchRequest {
    pub patient_name: String,
}

/// Decrypted patient record.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub contact_number: String,
    pub email: String,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id.get(),
            first_name: patient.profile.first_name,
            last_name: patient.profile.last_name,
            date_of_birth: patient.profile.date_of_birth,
            contact_number: patient.details.contact_number.clone(),
            email: patient.details.email.clone(),
            medical_history: patient.details.medical_history.clone(),
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

/// Response for `POST /patients`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientCreatedResponse {
    pub message: String,
    pub patient_id: i64,
}

/// A patient with everything scheduled or planned for them.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientOverviewResponse {
    pub patient: PatientResponse,
    pub appointments: Vec<AppointmentResponse>,
    pub treatment_plans: Vec<TreatmentPlanResponse>,
}

impl From<PatientOverview> for PatientOverviewResponse {
    fn from(overview: PatientOverview) -> Self {
        Self {
            patient: overview.patient.into(),
            appointments: overview.appointments.into_iter().map(Into::into).collect(),
            treatment_plans: overview
                .treatment_plans
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

fn sensitive<T: Serialize>(body: &T) -> HttpResponse {
    HttpResponse::Ok().insert_header(no_store_header()).json(body)
}

/// List patients ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    responses(
        (status = 200, description = "Patients", body = [PatientResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Stored record failed to decrypt", body = Error)
    ),
    tags = ["patients"],
    operation_id = "listPatients"
)]
#[get("/patients")]
pub async fn list_patients(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let patients = state.patients.list().await?;
    let body: Vec<PatientResponse> = patients.into_iter().map(Into::into).collect();
    Ok(sensitive(&body))
}

/// Register a patient.
#[utoipa::path(
    post,
    path = "/api/v1/patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created", body = PatientCreatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["patients"],
    operation_id = "createPatient"
)]
#[post("/patients")]
pub async fn create_patient(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    payload: web::Json<CreatePatientRequest>,
) -> ApiResult<HttpResponse> {
    let draft = PatientDraft::try_from(payload.into_inner())?;
    let id = state.patients.create(draft).await?;
    Ok(HttpResponse::Created().json(PatientCreatedResponse {
        message: "Patient created".to_owned(),
        patient_id: id.get(),
    }))
}

/// Fetch one patient.
#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient", body = PatientResponse),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Stored record failed to decrypt", body = Error)
    ),
    tags = ["patients"],
    operation_id = "getPatient"
)]
#[get("/patients/{id}")]
pub async fn get_patient(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = PatientId::new(path.into_inner())?;
    let patient = state.patients.get(id).await?;
    Ok(sensitive(&PatientResponse::from(patient)))
}

/// Update the supplied patient fields.
#[utoipa::path(
    put,
    path = "/api/v1/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Updated patient", body = PatientResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["patients"],
    operation_id = "updatePatient"
)]
#[put("/patients/{id}")]
pub async fn update_patient(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdatePatientRequest>,
) -> ApiResult<HttpResponse> {
    let id = PatientId::new(path.into_inner())?;
    let changes = PatientChanges::try_from(payload.into_inner())?;
    let patient = state.patients.update(id, changes).await?;
    Ok(sensitive(&PatientResponse::from(patient)))
}

/// Delete a patient that has no appointments or treatment plans.
#[utoipa::path(
    delete,
    path = "/api/v1/patients/{id}",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Patient is still referenced", body = Error)
    ),
    tags = ["patients"],
    operation_id = "deletePatient"
)]
#[delete("/patients/{id}")]
pub async fn delete_patient(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = PatientId::new(path.into_inner())?;
    state.patients.delete(id).await?;
    Ok(web::Json(MessageResponse::new("Patient deleted")))
}

/// Find the first patient whose name contains the fragment.
#[utoipa::path(
    post,
    path = "/api/v1/patients/search",
    request_body = PatientSearchRequest,
    responses(
        (status = 200, description = "Matching patient", body = PatientOverviewResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No patient found", body = Error)
    ),
    tags = ["patients"],
    operation_id = "searchPatients"
)]
#[post("/patients/search")]
pub async fn search_patients(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    payload: web::Json<PatientSearchRequest>,
) -> ApiResult<HttpResponse> {
    let fragment = payload.patient_name.trim();
    if fragment.is_empty() {
        return Err(ValidationError::new("patientName", ValidationReason::Empty).into());
    }
    let overview = state.patients.search(fragment).await?;
    Ok(sensitive(&PatientOverviewResponse::from(overview)))
}
