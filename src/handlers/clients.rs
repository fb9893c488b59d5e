// src/handlers/clients.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::types::Json as SqlJson;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::financial::{Client, ExtraExpense, PaymentStatus},
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

fn validate_percentage(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("A comissão deve estar entre 0 e 100.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_month_key_field(val: &str) -> Result<(), ValidationError> {
    crate::common::month::validate_month_key(val).map_err(|_| {
        let mut err = ValidationError::new("month_key");
        err.message = Some("Use o formato YYYY-MM.".into());
        err
    })
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtraExpensePayload {
    // Ausente no cadastro; presente na edição para preservar o registro
    pub id: Option<Uuid>,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub value: Decimal,
}

// Usado tanto no cadastro (POST) quanto na edição completa (PUT)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub monthly_value: Decimal,

    #[validate(range(min = 1, max = 31, message = "O dia de vencimento deve estar entre 1 e 31."))]
    pub payment_date: i32,

    pub payment_status: PaymentStatus,

    #[serde(default)]
    pub seller_name: String,

    #[validate(custom(function = "validate_percentage"))]
    #[serde(default)]
    pub seller_commission: Decimal,

    #[validate(nested)]
    #[serde(default)]
    pub extra_expenses: Vec<ExtraExpensePayload>,

    #[schema(value_type = Option<String>, format = Date)]
    pub contract_start_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_month_key_field"))]
    pub first_payment_month: Option<String>,

    #[validate(custom(function = "validate_month_key_field"))]
    pub last_payment_month: Option<String>,
}

impl ClientPayload {
    fn into_client(self, id: Uuid, user_id: Uuid) -> Client {
        let extra_expenses = self
            .extra_expenses
            .into_iter()
            .map(|e| ExtraExpense {
                id: e.id.unwrap_or_else(Uuid::new_v4),
                description: e.description,
                value: e.value,
            })
            .collect();

        Client {
            id,
            user_id,
            name: self.name,
            monthly_value: self.monthly_value,
            payment_date: self.payment_date,
            payment_status: self.payment_status,
            seller_name: self.seller_name,
            seller_commission: self.seller_commission,
            extra_expenses: SqlJson(extra_expenses),
            contract_start_date: self.contract_start_date,
            first_payment_month: self.first_payment_month,
            last_payment_month: self.last_payment_month,
            created_at: None,
            updated_at: None,
        }
    }
}

// ---
// Handlers
// ---

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "Carteira de clientes do usuário", body = Vec<Client>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.list(user.id).await?;
    Ok((StatusCode::OK, Json(clients)))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente criado (com comissão do mês, se já nasceu pago)", body = Client),
        (status = 400, description = "Dados inválidos"),
        (status = 402, description = "Período de teste expirado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = payload.into_client(Uuid::new_v4(), user.id);
    let created = app_state.client_service.create(client).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    request_body = ClientPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado (comissão do mês sincronizada)", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = payload.into_client(id, user.id);
    let updated = app_state.client_service.update(client).await?;

    Ok((StatusCode::OK, Json(updated)))
}

// POST /api/clients/{id}/mark-paid
#[utoipa::path(
    post,
    path = "/api/clients/{id}/mark-paid",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Mensalidade do mês corrente quitada", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_client_paid(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let updated = app_state.client_service.mark_paid(user.id, id).await?;
    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente e comissões associadas excluídos"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.client_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
