//! Admin list views. Add/change/delete go through the JSON CRUD routes
//! referenced by each model's `apiUrl`.

use crate::admin::{self, AdminIndex, AdminModelEntry, AdminTable, ACCOUNTS_ADMIN, USERS_ADMIN};
use crate::extractors::ValidatedQuery;
use crate::schemas::{ApiResponse, AppState, PageQuery};
use crate::store::{AccountStore, StoreError, UserStore};
use axum::extract::State;
use axum::response::Json;
use tracing::{debug, instrument};

/// List the models registered with the admin
#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    responses(
        (status = 200, description = "Admin index", body = ApiResponse<AdminIndex>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn admin_index(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AdminIndex>>, StoreError> {
    let accounts = AccountStore::new(&state.db).count().await?;
    let users = UserStore::new(&state.db).count().await?;

    let index = AdminIndex {
        models: vec![
            AdminModelEntry::new(&ACCOUNTS_ADMIN, accounts),
            AdminModelEntry::new(&USERS_ADMIN, users),
        ],
    };
    Ok(Json(ApiResponse::ok(index, "Site administration")))
}

/// Change list of accounts
#[utoipa::path(
    get,
    path = "/admin/accounts",
    tag = "admin",
    params(PageQuery),
    responses(
        (status = 200, description = "Account change list", body = ApiResponse<AdminTable>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn account_changelist(
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AdminTable>>, StoreError> {
    let page = query.page();
    let per_page = state.settings.page_size(query.limit);

    let (accounts, total) = AccountStore::new(&state.db).list_page(page, per_page).await?;
    debug!("Rendering {} account rows", accounts.len());

    let rows = accounts.iter().map(admin::account_row).collect();
    let table = ACCOUNTS_ADMIN.table(rows, page, per_page, total);
    Ok(Json(ApiResponse::ok(table, "Select accounts model to change")))
}

/// Change list of users, showing the linked account
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    params(PageQuery),
    responses(
        (status = 200, description = "User change list", body = ApiResponse<AdminTable>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn user_changelist(
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AdminTable>>, StoreError> {
    let page = query.page();
    let per_page = state.settings.page_size(query.limit);

    let (users, total) = UserStore::new(&state.db)
        .list_page_with_accounts(page, per_page)
        .await?;
    debug!("Rendering {} user rows", users.len());

    let rows = users
        .iter()
        .map(|(user, account)| admin::user_row(user, account.as_ref()))
        .collect();
    let table = USERS_ADMIN.table(rows, page, per_page, total);
    Ok(Json(ApiResponse::ok(table, "Select user to change")))
}
