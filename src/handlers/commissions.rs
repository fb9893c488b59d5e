// src/handlers/commissions.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::financial::{CommissionStatus, SellerCommissionRecord},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommissionListParams {
    // Sem o filtro, devolve o histórico completo
    pub month: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateCommissionsPayload {
    #[schema(example = "2026-03")]
    pub month: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommissionStatusPayload {
    pub status: CommissionStatus,
}

// GET /api/commissions?month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/commissions",
    tag = "Commissions",
    params(CommissionListParams),
    responses(
        (status = 200, description = "Comissões (do mês, se filtrado)", body = Vec<SellerCommissionRecord>),
        (status = 400, description = "Chave de mês inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_commissions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<CommissionListParams>,
) -> Result<impl IntoResponse, AppError> {
    let records = match params.month.as_deref() {
        Some(month) => app_state.commission_service.list_by_month(user.id, month).await?,
        None => app_state.commission_service.list_all(user.id).await?,
    };

    Ok((StatusCode::OK, Json(records)))
}

// POST /api/commissions/generate
#[utoipa::path(
    post,
    path = "/api/commissions/generate",
    tag = "Commissions",
    request_body = GenerateCommissionsPayload,
    responses(
        (status = 200, description = "Comissões do mês geradas/atualizadas (idempotente)", body = Vec<SellerCommissionRecord>),
        (status = 400, description = "Chave de mês inválida"),
        (status = 402, description = "Período de teste expirado")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_commissions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<GenerateCommissionsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let records = app_state
        .commission_service
        .generate_for_month(user.id, &payload.month)
        .await?;

    Ok((StatusCode::OK, Json(records)))
}

// PATCH /api/commissions/{id}/status
#[utoipa::path(
    patch,
    path = "/api/commissions/{id}/status",
    tag = "Commissions",
    request_body = CommissionStatusPayload,
    params(("id" = String, Path, description = "ID da comissão ({clientId}-{YYYY-MM})")),
    responses(
        (status = 200, description = "Status alternado (paid_date acompanha)", body = SellerCommissionRecord),
        (status = 404, description = "Comissão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_commission_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    Json(payload): Json<CommissionStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let record = app_state
        .commission_service
        .set_status(user.id, &id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(record)))
}
