use crate::handlers::{
    accounts::{create_account, delete_account, get_account, get_accounts, update_account},
    admin::{account_changelist, admin_index, user_changelist},
    health::health_check,
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = state.settings.request_timeout();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Admin list views
        .route("/admin", get(admin_index))
        .route("/admin/accounts", get(account_changelist))
        .route("/admin/users", get(user_changelist))
        // Account CRUD routes
        .route("/api/v1/accounts", post(create_account).get(get_accounts))
        .route(
            "/api/v1/accounts/:account_id",
            get(get_account).put(update_account).delete(delete_account),
        )
        // User CRUD routes
        .route("/api/v1/users", post(create_user).get(get_users))
        .route(
            "/api/v1/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
