//! Treatment plan handlers. Staff only.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::treatment_plan::{diagnosis, treatment_details};
use crate::domain::{
    Error, PatientId, TreatmentPlan, TreatmentPlanChanges, TreatmentPlanDraft, TreatmentPlanId,
    TreatmentStatus,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MessageResponse;
use crate::inbound::http::guard::{Guarded, Staff};
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreatmentPlanRequest {
    pub patient_id: i64,
    pub diagnosis: String,
    pub treatment_details: String,
    /// Defaults to `Pending`.
    pub status: Option<TreatmentStatus>,
}

impl TryFrom<CreateTreatmentPlanRequest> for TreatmentPlanDraft {
    type Error = Error;

    fn try_from(value: CreateTreatmentPlanRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            patient_id: PatientId::new(value.patient_id)?,
            diagnosis: diagnosis(&value.diagnosis)?,
            treatment_details: treatment_details(&value.treatment_details)?,
            status: value.status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTreatmentPlanRequest {
    pub patient_id: Option<i64>,
    pub diagnosis: Option<String>,
    pub treatment_details: Option<String>,
    pub status: Option<TreatmentStatus>,
}

impl TryFrom<UpdateTreatmentPlanRequest> for TreatmentPlanChanges {
    type Error = Error;

    fn try_from(value: UpdateTreatmentPlanRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            patient_id: value.patient_id.map(PatientId::new).transpose()?,
            diagnosis: value.diagnosis.as_deref().map(diagnosis).transpose()?,
            treatment_details: value
                .treatment_details
                .as_deref()
                .map(treatment_details)
                .transpose()?,
            status: value.status,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentPlanResponse {
    pub id: i64,
    pub patient_id: i64,
    pub diagnosis: String,
    pub treatment_details: String,
    pub status: TreatmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<TreatmentPlan> for TreatmentPlanResponse {
    fn from(plan: TreatmentPlan) -> Self {
        Self {
            id: plan.id.get(),
            patient_id: plan.patient_id.get(),
            diagnosis: plan.diagnosis,
            treatment_details: plan.treatment_details,
            status: plan.status,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/treatment-plans",
    responses(
        (status = 200, description = "Treatment plans", body = [TreatmentPlanResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["treatment-plans"],
    operation_id = "listTreatmentPlans"
)]
#[get("/treatment-plans")]
pub async fn list_treatment_plans(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<TreatmentPlanResponse>>> {
    let plans = state.treatment_plans.list().await?;
    Ok(web::Json(plans.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/treatment-plans",
    request_body = CreateTreatmentPlanRequest,
    responses(
        (status = 201, description = "Plan recorded", body = TreatmentPlanResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Patient not found", body = Error)
    ),
    tags = ["treatment-plans"],
    operation_id = "createTreatmentPlan"
)]
#[post("/treatment-plans")]
pub async fn create_treatment_plan(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    payload: web::Json<CreateTreatmentPlanRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TreatmentPlanDraft::try_from(payload.into_inner())?;
    let plan = state.treatment_plans.create(draft).await?;
    Ok(HttpResponse::Created().json(TreatmentPlanResponse::from(plan)))
}

#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/treatment-plans",
    params(("id" = i64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Plans for the patient", body = [TreatmentPlanResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "No plans for the patient", body = Error)
    ),
    tags = ["treatment-plans"],
    operation_id = "listPatientTreatmentPlans"
)]
#[get("/patients/{id}/treatment-plans")]
pub async fn list_patient_treatment_plans(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<TreatmentPlanResponse>>> {
    let patient_id = PatientId::new(path.into_inner())?;
    let plans = state.treatment_plans.list_for_patient(patient_id).await?;
    Ok(web::Json(plans.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/treatment-plans/{id}",
    params(("id" = i64, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Treatment plan", body = TreatmentPlanResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["treatment-plans"],
    operation_id = "getTreatmentPlan"
)]
#[get("/treatment-plans/{id}")]
pub async fn get_treatment_plan(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TreatmentPlanResponse>> {
    let id = TreatmentPlanId::new(path.into_inner())?;
    Ok(web::Json(state.treatment_plans.get(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/treatment-plans/{id}",
    params(("id" = i64, Path, description = "Plan id")),
    request_body = UpdateTreatmentPlanRequest,
    responses(
        (status = 200, description = "Updated plan", body = TreatmentPlanResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Plan or patient not found", body = Error)
    ),
    tags = ["treatment-plans"],
    operation_id = "updateTreatmentPlan"
)]
#[put("/treatment-plans/{id}")]
pub async fn update_treatment_plan(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateTreatmentPlanRequest>,
) -> ApiResult<web::Json<TreatmentPlanResponse>> {
    let id = TreatmentPlanId::new(path.into_inner())?;
    let changes = TreatmentPlanChanges::try_from(payload.into_inner())?;
    Ok(web::Json(state.treatment_plans.update(id, changes).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/treatment-plans/{id}",
    params(("id" = i64, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["treatment-plans"],
    operation_id = "deleteTreatmentPlan"
)]
#[delete("/treatment-plans/{id}")]
pub async fn delete_treatment_plan(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = TreatmentPlanId::new(path.into_inner())?;
    state.treatment_plans.delete(id).await?;
    Ok(web::Json(MessageResponse::new("Treatment plan deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{MockPorts, session_cookie, sign_in_request, test_app};
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn plan(id: i64, patient_id: i64) -> TreatmentPlan {
        TreatmentPlan {
            id: TreatmentPlanId::new(id).expect("valid id"),
            patient_id: PatientId::new(patient_id).expect("valid id"),
            diagnosis: "Sprain".to_owned(),
            treatment_details: "Rest and ice".to_owned(),
            status: TreatmentStatus::Ongoing,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).expect("fixture time"),
            updated_at: None,
        }
    }

    async fn send(ports: MockPorts, role: &str, request: actix_test::TestRequest) -> ServiceResponse {
        let app = actix_test::init_service(test_app(ports)).await;
        let res = actix_test::call_service(&app, sign_in_request(role, 1).to_request()).await;
        actix_test::call_service(&app, request.cookie(session_cookie(&res)).to_request()).await
    }

    #[rstest]
    fn status_defaults_to_pending() {
        let draft = TreatmentPlanDraft::try_from(CreateTreatmentPlanRequest {
            patient_id: 4,
            diagnosis: "Sprain".to_owned(),
            treatment_details: "Rest and ice".to_owned(),
            status: None,
        })
        .expect("valid plan");
        assert_eq!(draft.status, TreatmentStatus::Pending);
    }

    #[rstest]
    #[case::lowercase(json!("ongoing"))]
    #[case::unknown(json!("Abandoned"))]
    #[actix_web::test]
    async fn unknown_statuses_are_rejected(#[case] status: Value) {
        let mut ports = MockPorts::default();
        ports.treatment_plans.expect_create().times(0);
        let res = send(
            ports,
            "admin",
            actix_test::TestRequest::post()
                .uri("/api/v1/treatment-plans")
                .set_json(json!({
                    "patientId": 4,
                    "diagnosis": "Sprain",
                    "treatmentDetails": "Rest",
                    "status": status,
                })),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn plans_for_a_patient_are_listed() {
        let mut ports = MockPorts::default();
        ports
            .treatment_plans
            .expect_list_for_patient()
            .withf(|id| id.get() == 4)
            .times(1)
            .return_once(|_| Ok(vec![plan(1, 4), plan(2, 4)]));
        let res = send(
            ports,
            "user",
            actix_test::TestRequest::get().uri("/api/v1/patients/4/treatment-plans"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        let ids: Vec<i64> = body
            .as_array()
            .expect("array body")
            .iter()
            .filter_map(|plan| plan["id"].as_i64())
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(body[0]["patientId"], 4);
        assert_eq!(body[0]["status"], "Ongoing");
    }

    #[rstest]
    #[actix_web::test]
    async fn patient_without_plans_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .treatment_plans
            .expect_list_for_patient()
            .return_once(|_| Err(Error::not_found("no treatment plans found for patient 9")));
        let res = send(
            ports,
            "admin",
            actix_test::TestRequest::get().uri("/api/v1/patients/9/treatment-plans"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "not_found");
    }

    #[rstest]
    #[case::zero("0")]
    #[case::text("abc")]
    #[actix_web::test]
    async fn malformed_patient_ids_are_rejected(#[case] raw: &str) {
        let mut ports = MockPorts::default();
        ports.treatment_plans.expect_list_for_patient().times(0);
        let res = send(
            ports,
            "admin",
            actix_test::TestRequest::get().uri(&format!("/api/v1/patients/{raw}/treatment-plans")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[actix_web::test]
    async fn non_staff_roles_cannot_list_patient_plans() {
        let mut ports = MockPorts::default();
        ports.treatment_plans.expect_list_for_patient().times(0);
        let res = send(
            ports,
            "auditor",
            actix_test::TestRequest::get().uri("/api/v1/patients/4/treatment-plans"),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "forbidden");
    }
}
