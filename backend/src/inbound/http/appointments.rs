//! Appointment handlers. Staff only.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::appointment::appointment_notes;
use crate::domain::{
    Appointment, AppointmentChanges, AppointmentDraft, AppointmentId, Error, PatientId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MessageResponse;
use crate::inbound::http::guard::{Guarded, Staff};
use crate::inbound::http::state::HttpState;

/// Booking body. `appointmentDate` is a local date-time without offset.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: i64,
    pub appointment_date: NaiveDateTime,
    pub notes: Option<String>,
}

impl TryFrom<CreateAppointmentRequest> for AppointmentDraft {
    type Error = Error;

    fn try_from(value: CreateAppointmentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            patient_id: PatientId::new(value.patient_id)?,
            appointment_date: value.appointment_date,
            notes: appointment_notes(value.notes.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub patient_id: Option<i64>,
    pub appointment_date: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

impl TryFrom<UpdateAppointmentRequest> for AppointmentChanges {
    type Error = Error;

    fn try_from(value: UpdateAppointmentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            patient_id: value.patient_id.map(PatientId::new).transpose()?,
            appointment_date: value.appointment_date,
            notes: appointment_notes(value.notes.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: i64,
    pub patient_id: i64,
    pub appointment_date: NaiveDateTime,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(value: Appointment) -> Self {
        Self {
            id: value.id.get(),
            patient_id: value.patient_id.get(),
            appointment_date: value.appointment_date,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    responses(
        (status = 200, description = "Appointments", body = [AppointmentResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments"
)]
#[get("/appointments")]
pub async fn list_appointments(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<AppointmentResponse>>> {
    let appointments = state.appointments.list().await?;
    Ok(web::Json(appointments.into_iter().map(Into::into).collect()))
}

/// Book an appointment for an existing patient.
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Patient not found", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "createAppointment"
)]
#[post("/appointments")]
pub async fn create_appointment(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    payload: web::Json<CreateAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    let draft = AppointmentDraft::try_from(payload.into_inner())?;
    let appointment = state.appointments.create(draft).await?;
    Ok(HttpResponse::Created().json(AppointmentResponse::from(appointment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "getAppointment"
)]
#[get("/appointments/{id}")]
pub async fn get_appointment(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    let id = AppointmentId::new(path.into_inner())?;
    Ok(web::Json(state.appointments.get(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Updated appointment", body = AppointmentResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Appointment or patient not found", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "updateAppointment"
)]
#[put("/appointments/{id}")]
pub async fn update_appointment(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateAppointmentRequest>,
) -> ApiResult<web::Json<AppointmentResponse>> {
    let id = AppointmentId::new(path.into_inner())?;
    let changes = AppointmentChanges::try_from(payload.into_inner())?;
    Ok(web::Json(state.appointments.update(id, changes).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    params(("id" = i64, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "deleteAppointment"
)]
#[delete("/appointments/{id}")]
pub async fn delete_appointment(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = AppointmentId::new(path.into_inner())?;
    state.appointments.delete(id).await?;
    Ok(web::Json(MessageResponse::new("Appointment deleted")))
}
