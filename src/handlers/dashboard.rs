// src/handlers/dashboard.rs

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
    common::month::{month_key, validate_month_key},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::financial::{FinancialSummary, PaymentStatus},
    services::summary::{month_forecast, summarize, MonthForecast, SummaryFilter},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryParams {
    // "YYYY-MM" para o recorte mensal; ausente ou "total" = carteira inteira
    pub month: Option<String>,
}

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    params(SummaryParams),
    responses(
        (status = 200, description = "Resumo financeiro (total ou por mês)", body = FinancialSummary),
        (status = 400, description = "Chave de mês inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<SummaryParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = match params.month.as_deref() {
        None | Some("total") => SummaryFilter::Total,
        Some(month) => {
            validate_month_key(month)?;
            SummaryFilter::Month(month.to_string())
        }
    };

    // O resumo é derivado em memória sobre as coleções carregadas,
    // nunca persistido
    let clients = app_state.client_service.list(user.id).await?;
    let expenses = app_state.expense_repo.get_all(user.id).await?;
    let commissions = app_state.commission_service.list_all(user.id).await?;

    let summary = summarize(&clients, &expenses, &commissions, &filter);

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/forecast
#[utoipa::path(
    get,
    path = "/api/dashboard/forecast",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Previsão do mês corrente (esperado, recebido, a receber)", body = MonthForecast)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_forecast(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.list(user.id).await?;
    let current_month = month_key(Utc::now().date_naive());

    let forecast = month_forecast(&clients, &current_month);

    Ok((StatusCode::OK, Json(forecast)))
}

// Distribuição dos clientes pelo status manual de pagamento
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub paid: usize,
    pub pending: usize,
    pub overdue: usize,
    pub total: usize,
}

// GET /api/dashboard/status-breakdown
#[utoipa::path(
    get,
    path = "/api/dashboard/status-breakdown",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contagem de clientes por status de pagamento", body = StatusBreakdown)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_status_breakdown(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.list(user.id).await?;

    let count = |status: PaymentStatus| {
        clients.iter().filter(|c| c.payment_status == status).count()
    };

    let breakdown = StatusBreakdown {
        paid: count(PaymentStatus::Paid),
        pending: count(PaymentStatus::Pending),
        overdue: count(PaymentStatus::Overdue),
        total: clients.len(),
    };

    Ok((StatusCode::OK, Json(breakdown)))
}
