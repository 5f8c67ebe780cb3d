use crate::extractors::ValidatedJson;
use crate::schemas::{ApiResponse, AppState};
use crate::store::{StoreError, UserChanges, UserForm, UserStore};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::user;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

/// User response model
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub user_name: String,
    pub hoge_id: i32,
    /// Account this user is linked to
    pub account_id: i32,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            user_name: model.user_name,
            hoge_id: model.hoge_id,
            account_id: model.account_id,
        }
    }
}

/// Create a new user linked to an account
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = UserForm,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request or account already linked", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<UserForm>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), StoreError> {
    trace!("Entering create_user function");
    debug!("Creating user {} for account {}", form.user_name, form.account_id);

    let created = UserStore::new(&state.db).create(form).await?;
    info!("User created with ID: {}", created.id);

    let response = ApiResponse::ok(UserResponse::from(created), "User created successfully");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, StoreError> {
    trace!("Entering get_users function");

    let users = UserStore::new(&state.db).list().await?;
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Users retrieved successfully")))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, StoreError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    let user = UserStore::new(&state.db).get(user_id).await?;
    Ok(Json(ApiResponse::ok(
        UserResponse::from(user),
        "User retrieved successfully",
    )))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UserChanges,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request or account already linked", body = ErrorResponse),
        (status = 404, description = "User or account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    ValidatedJson(changes): ValidatedJson<UserChanges>,
) -> Result<Json<ApiResponse<UserResponse>>, StoreError> {
    trace!("Entering update_user function for user_id: {}", user_id);
    debug!("Updating user with ID {}: {:?}", user_id, changes);

    let updated = UserStore::new(&state.db).update(user_id, changes).await?;
    Ok(Json(ApiResponse::ok(
        UserResponse::from(updated),
        "User updated successfully",
    )))
}

/// Delete a user; the linked account is kept
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StoreError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    let deleted = UserStore::new(&state.db).delete(user_id).await?;
    Ok(Json(ApiResponse::ok(
        format!("User {} deleted", deleted.user_name),
        "User deleted successfully",
    )))
}
