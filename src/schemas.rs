use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

use crate::admin::{AdminColumn, AdminIndex, AdminModelEntry, AdminRow, AdminTable};
use crate::config::Settings;
use crate::handlers::accounts::AccountResponse;
use crate::handlers::users::UserResponse;
use crate::store::{AccountChanges, AccountForm, UserChanges, UserForm};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Runtime settings
    pub settings: Settings,
}

/// Pagination parameters accepted by list endpoints
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: configured page size)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
    /// Form errors keyed by field name; `__all__` holds errors not tied to a field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::get_accounts,
        crate::handlers::accounts::get_account,
        crate::handlers::accounts::update_account,
        crate::handlers::accounts::delete_account,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::admin::admin_index,
        crate::handlers::admin::account_changelist,
        crate::handlers::admin::user_changelist,
    ),
    components(
        schemas(
            ApiResponse<AccountResponse>,
            ApiResponse<Vec<AccountResponse>>,
            ApiResponse<UserResponse>,
            ApiResponse<Vec<UserResponse>>,
            ApiResponse<AdminTable>,
            ApiResponse<AdminIndex>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            PageQuery,
            AccountForm,
            AccountChanges,
            AccountResponse,
            UserForm,
            UserChanges,
            UserResponse,
            AdminIndex,
            AdminModelEntry,
            AdminTable,
            AdminColumn,
            AdminRow,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Account CRUD endpoints"),
        (name = "users", description = "User CRUD endpoints"),
        (name = "admin", description = "Admin list views"),
    ),
    info(
        title = "Accounts Admin API",
        description = "CRUD and admin list views over account and user records",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
