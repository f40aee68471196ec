//! Staff account administration handlers. Every route is admin-only.
//!
//! ```text
//! POST   /api/v1/users {"username":"nurse","email":"n@clinic.test","role":"user","password":"pw"}
//! GET    /api/v1/users
//! PUT    /api/v1/users/{id} {"role":"admin"}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::access::Role;
use crate::domain::{
    AccountChanges, AccountDraft, EmailAddress, Error, Password, User, UserId, Username,
    ValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MessageResponse;
use crate::inbound::http::guard::{AdminOnly, Guarded};
use crate::inbound::http::state::HttpState;

/// Registration body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

impl TryFrom<CreateUserRequest> for AccountDraft {
    type Error = ValidationError;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: Username::new(&value.username)?,
            email: EmailAddress::new(&value.email)?,
            role: Role::new(value.role)?,
            password: Password::new(&value.password)?,
        })
    }
}

/// Partial account update; omitted fields keep their stored values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<UpdateUserRequest> for AccountChanges {
    type Error = ValidationError;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: value.username.map(Username::new).transpose()?,
            email: value.email.map(EmailAddress::new).transpose()?,
            role: value.role.map(Role::new).transpose()?,
            password: value.password.as_deref().map(Password::new).transpose()?,
        })
    }
}

/// Account as exposed to administrators. Password hashes never leave the
/// domain.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.to_string(),
            email: user.email.as_ref().to_owned(),
            role: user.role.to_string(),
        }
    }
}

/// Create a staff account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Username already exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    _guard: Guarded<AdminOnly>,
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = AccountDraft::try_from(payload.into_inner())?;
    let user = state.users.register(draft).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// List staff accounts ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Accounts", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    _guard: Guarded<AdminOnly>,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Update a staff account.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "Account id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Username already exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    _guard: Guarded<AdminOnly>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(path.into_inner())?;
    let changes = AccountChanges::try_from(payload.into_inner())?;
    let user = state.users.update(id, changes).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Delete a staff account other than the caller's own.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Forbidden or self-deletion", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    guard: Guarded<AdminOnly>,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = UserId::new(path.into_inner())?;
    state.users.delete(guard.identity(), id).await?;
    Ok(web::Json(MessageResponse::new("User deleted")))
}
