//! Dashboard summary for any signed-in caller.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::appointments::AppointmentResponse;
use crate::inbound::http::auth::SessionUser;
use crate::inbound::http::guard::{Guarded, SignedIn};
use crate::inbound::http::inventory::InventoryItemResponse;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Appointments in the next two days, soonest first.
    pub upcoming_appointments: Vec<AppointmentResponse>,
    /// Items whose quantity has fallen below their reorder threshold.
    pub low_stock_items: Vec<InventoryItemResponse>,
    /// The signed-in caller the summary was built for.
    pub user: SessionUser,
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    guard: Guarded<SignedIn>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DashboardResponse>> {
    let upcoming = state.appointments.upcoming().await?;
    let low_stock = state.inventory.low_stock().await?;
    Ok(web::Json(DashboardResponse {
        upcoming_appointments: upcoming.into_iter().map(Into::into).collect(),
        low_stock_items: low_stock.into_iter().map(Into::into).collect(),
        user: SessionUser::from(guard.identity()),
    }))
}
