// src/handlers/expenses.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::financial::AgencyExpense,
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn default_category() -> String {
    "Geral".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub value: Decimal,

    #[serde(default = "default_category")]
    #[schema(example = "Geral")]
    pub category: String,
}

// GET /api/expenses
#[utoipa::path(
    get,
    path = "/api/expenses",
    tag = "Expenses",
    responses(
        (status = 200, description = "Despesas da agência", body = Vec<AgencyExpense>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let expenses = app_state.expense_repo.get_all(user.id).await?;
    Ok((StatusCode::OK, Json(expenses)))
}

// POST /api/expenses
#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Expenses",
    request_body = ExpensePayload,
    responses(
        (status = 201, description = "Despesa criada", body = AgencyExpense),
        (status = 400, description = "Dados inválidos"),
        (status = 402, description = "Período de teste expirado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let expense = app_state
        .expense_repo
        .create(user.id, &payload.description, payload.value, &payload.category)
        .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

// PUT /api/expenses/{id}
#[utoipa::path(
    put,
    path = "/api/expenses/{id}",
    tag = "Expenses",
    request_body = ExpensePayload,
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 200, description = "Despesa atualizada", body = AgencyExpense),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_expense(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let expense = app_state
        .expense_repo
        .update(user.id, id, &payload.description, payload.value, &payload.category)
        .await?;

    Ok((StatusCode::OK, Json(expense)))
}

// DELETE /api/expenses/{id}
#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    tag = "Expenses",
    params(("id" = Uuid, Path, description = "ID da despesa")),
    responses(
        (status = 204, description = "Despesa excluída"),
        (status = 404, description = "Despesa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_expense(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.expense_repo.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
