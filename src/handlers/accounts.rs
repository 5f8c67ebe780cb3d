use crate::extractors::ValidatedJson;
use crate::schemas::{ApiResponse, AppState};
use crate::store::{AccountChanges, AccountForm, AccountStore, StoreError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::account;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;

/// Account response model
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i32,
    pub user_name: String,
    pub hoge_id: i32,
}

impl From<account::Model> for AccountResponse {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            user_name: model.user_name,
            hoge_id: model.hoge_id,
        }
    }
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = AccountForm,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<AccountForm>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), StoreError> {
    trace!("Entering create_account function");
    debug!("Creating account with user_name: {}, hoge_id: {}", form.user_name, form.hoge_id);

    let created = AccountStore::new(&state.db).create(form).await?;
    let response = ApiResponse::ok(AccountResponse::from(created), "Account created successfully");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_accounts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, StoreError> {
    trace!("Entering get_accounts function");

    let accounts = AccountStore::new(&state.db).list().await?;
    info!("Successfully retrieved {} accounts", accounts.len());

    let data = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Accounts retrieved successfully")))
}

/// Get a specific account by ID
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiResponse<AccountResponse>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AccountResponse>>, StoreError> {
    trace!("Entering get_account function for account_id: {}", account_id);

    let account = AccountStore::new(&state.db).get(account_id).await?;
    Ok(Json(ApiResponse::ok(
        AccountResponse::from(account),
        "Account retrieved successfully",
    )))
}

/// Update an account
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    request_body = AccountChanges,
    responses(
        (status = 200, description = "Account updated successfully", body = ApiResponse<AccountResponse>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
    ValidatedJson(changes): ValidatedJson<AccountChanges>,
) -> Result<Json<ApiResponse<AccountResponse>>, StoreError> {
    trace!("Entering update_account function for account_id: {}", account_id);
    debug!("Updating account with ID {}: {:?}", account_id, changes);

    let updated = AccountStore::new(&state.db).update(account_id, changes).await?;
    Ok(Json(ApiResponse::ok(
        AccountResponse::from(updated),
        "Account updated successfully",
    )))
}

/// Delete an account and the user linked to it
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StoreError> {
    trace!("Entering delete_account function for account_id: {}", account_id);

    let deletion = AccountStore::new(&state.db).delete(account_id).await?;
    let summary = match deletion.cascaded_users {
        0 => format!("Account {} deleted", deletion.account),
        n => format!("Account {} deleted with {} linked user(s)", deletion.account, n),
    };
    Ok(Json(ApiResponse::ok(summary, "Account deleted successfully")))
}
