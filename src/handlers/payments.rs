// src/handlers/payments.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::financial::PaymentStatus,
    services::billing_status::{build_charges, ChargeCounts, ChargeEntry},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChargeListParams {
    // Filtra pelo status DERIVADO (paid | pending | overdue)
    pub status: Option<PaymentStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargesResponse {
    pub charges: Vec<ChargeEntry>,
    pub counts: ChargeCounts,
}

// GET /api/payments
//
// Tela de cobranças: cada cliente anotado com o status derivado da data
// de hoje (projeção pura — o payment_status manual não é alterado).
// Clientes antes do primeiro mês de cobrança ficam de fora da lista e
// dos contadores.
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    params(ChargeListParams),
    responses(
        (status = 200, description = "Cobranças do mês, atrasadas primeiro", body = ChargesResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_charges(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ChargeListParams>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.list(user.id).await?;

    let today = Utc::now().date_naive();
    let (mut charges, counts) = build_charges(clients, today);

    if let Some(status) = params.status {
        charges.retain(|entry| entry.status == status);
    }

    Ok((StatusCode::OK, Json(ChargesResponse { charges, counts })))
}
