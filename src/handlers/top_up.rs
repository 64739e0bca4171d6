use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::{TopUpRequest, TopUpResponse};
use crate::models::models::AppState;
use crate::services::topup_service::TopUpService;
use axum::extract::{Extension, Json, State};
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/topup",
    request_body = TopUpRequest,
    responses(
        (status = 200, description = "Virtual account created, payment pending", body = TopUpResponse),
        (status = 400, description = "Invalid amount or bank code"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Payment provider unavailable")
    ),
    security(("bearerAuth" = [])),
    tag = "Top-up"
)]
pub async fn top_up(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<TopUpRequest>,
) -> Result<Json<TopUpResponse>, ApiError> {
    req.validate().map_err(ApiError::Validation)?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        error!("Invalid user ID in claims: {}", e);
        ApiError::Auth("Invalid user ID".to_string())
    })?;

    let response = TopUpService::initiate_top_up(state, user_id, req).await?;
    Ok(Json(response))
}
