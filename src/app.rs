use axum::{middleware, Router};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::security_config::auth_middleware;
use crate::config::swagger_config::ApiDoc;
use crate::handlers::{
    health::health_check, payment_status::payment_status, top_up::top_up,
    transactions::get_transactions, transfer::transfer,
    va_webhook::virtual_account_webhook, wallet::get_wallet,
};
use crate::models::models::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes: the webhook authenticates with its own callback token
    let public_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", axum::routing::get(health_check))
        .route(
            "/api/webhooks/virtual-account",
            axum::routing::post(virtual_account_webhook),
        );

    // Protected routes (require JWT authentication)
    let protected_router = Router::new()
        .route("/api/wallet", axum::routing::get(get_wallet))
        .route("/api/transactions", axum::routing::get(get_transactions))
        .route("/api/topup", axum::routing::post(top_up))
        .route(
            "/api/payments/{external_id}",
            axum::routing::get(payment_status),
        )
        .route("/api/transfer", axum::routing::post(transfer))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_router)
        .merge(protected_router)
        .with_state(state)
}
