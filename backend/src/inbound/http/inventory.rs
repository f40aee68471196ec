//! Stock item handlers. Staff only.
//!
//! Counts arrive as signed JSON integers and are rejected when negative.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::inventory::{DEFAULT_THRESHOLD, item_description, item_name, item_unit};
use crate::domain::validation::non_negative;
use crate::domain::{
    Error, InventoryChanges, InventoryItem, InventoryItemDraft, InventoryItemId, ValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MessageResponse;
use crate::inbound::http::guard::{Guarded, Staff};
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    /// Reorder level; defaults to 25.
    pub threshold: Option<i64>,
    pub unit: Option<String>,
}

impl TryFrom<CreateInventoryItemRequest> for InventoryItemDraft {
    type Error = ValidationError;

    fn try_from(value: CreateInventoryItemRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: item_name(&value.name)?,
            description: item_description(value.description.as_deref())?,
            quantity: non_negative("quantity", value.quantity)?,
            threshold: value
                .threshold
                .map(|raw| non_negative("threshold", raw))
                .transpose()?
                .unwrap_or(DEFAULT_THRESHOLD),
            unit: item_unit(value.unit.as_deref())?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub threshold: Option<i64>,
    pub unit: Option<String>,
}

impl TryFrom<UpdateInventoryItemRequest> for InventoryChanges {
    type Error = ValidationError;

    fn try_from(value: UpdateInventoryItemRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name.as_deref().map(item_name).transpose()?,
            description: item_description(value.description.as_deref())?,
            quantity: value
                .quantity
                .map(|raw| non_negative("quantity", raw))
                .transpose()?,
            threshold: value
                .threshold
                .map(|raw| non_negative("threshold", raw))
                .transpose()?,
            unit: item_unit(value.unit.as_deref())?,
        })
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub threshold: u32,
    pub unit: Option<String>,
    pub low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<InventoryItem> for InventoryItemResponse {
    fn from(item: InventoryItem) -> Self {
        Self {
            id: item.id.get(),
            low_stock: item.is_low_stock(),
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            threshold: item.threshold,
            unit: item.unit,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    responses(
        (status = 200, description = "Stock items", body = [InventoryItemResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "listInventory"
)]
#[get("/inventory")]
pub async fn list_inventory(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<InventoryItemResponse>>> {
    let items = state.inventory.list().await?;
    Ok(web::Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateInventoryItemRequest,
    responses(
        (status = 201, description = "Item created", body = InventoryItemResponse),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "createInventoryItem"
)]
#[post("/inventory")]
pub async fn create_inventory_item(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    payload: web::Json<CreateInventoryItemRequest>,
) -> ApiResult<HttpResponse> {
    let draft = InventoryItemDraft::try_from(payload.into_inner())?;
    let item = state.inventory.create(draft).await?;
    Ok(HttpResponse::Created().json(InventoryItemResponse::from(item)))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Stock item", body = InventoryItemResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "getInventoryItem"
)]
#[get("/inventory/{id}")]
pub async fn get_inventory_item(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<InventoryItemResponse>> {
    let id = InventoryItemId::new(path.into_inner())?;
    Ok(web::Json(state.inventory.get(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/inventory/{id}",
    params(("id" = i64, Path, description = "Item id")),
    request_body = UpdateInventoryItemRequest,
    responses(
        (status = 200, description = "Updated item", body = InventoryItemResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "updateInventoryItem"
)]
#[put("/inventory/{id}")]
pub async fn update_inventory_item(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateInventoryItemRequest>,
) -> ApiResult<web::Json<InventoryItemResponse>> {
    let id = InventoryItemId::new(path.into_inner())?;
    let changes = InventoryChanges::try_from(payload.into_inner())?;
    Ok(web::Json(state.inventory.update(id, changes).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/inventory/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["inventory"],
    operation_id = "deleteInventoryItem"
)]
#[delete("/inventory/{id}")]
pub async fn delete_inventory_item(
    _guard: Guarded<Staff>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = InventoryItemId::new(path.into_inner())?;
    state.inventory.delete(id).await?;
    Ok(web::Json(MessageResponse::new("Inventory item deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationReason;
    use rstest::rstest;

    fn request(quantity: i64, threshold: Option<i64>) -> CreateInventoryItemRequest {
        CreateInventoryItemRequest {
            name: " Gauze ".to_owned(),
            description: None,
            quantity,
            threshold,
            unit: Some("box".to_owned()),
        }
    }

    #[rstest]
    fn threshold_defaults_when_omitted() {
        let draft = InventoryItemDraft::try_from(request(10, None)).expect("valid item");
        assert_eq!(draft.threshold, DEFAULT_THRESHOLD);
        assert_eq!(draft.name, "Gauze");
    }

    #[rstest]
    #[case(-1, None, "quantity")]
    #[case(3, Some(-5), "threshold")]
    fn negative_counts_are_rejected(
        #[case] quantity: i64,
        #[case] threshold: Option<i64>,
        #[case] field: &str,
    ) {
        let err = InventoryItemDraft::try_from(request(quantity, threshold))
            .expect_err("negative counts are invalid");
        assert_eq!(err.field(), field);
        assert_eq!(err.reason(), ValidationReason::Negative);
    }

    #[rstest]
    fn response_flags_low_stock() {
        let item = InventoryItem {
            id: InventoryItemId::new(3).expect("fixture id"),
            name: "Gloves".to_owned(),
            description: None,
            quantity: 5,
            threshold: 25,
            unit: None,
            created_at: DateTime::from_timestamp(0, 0).expect("epoch"),
            updated_at: None,
        };
        assert!(InventoryItemResponse::from(item).low_stock);
    }
}
