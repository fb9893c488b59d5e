// src/handlers/billing.rs

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::subscription::{all_plans, Plan},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutPayload {
    #[validate(length(min = 1, message = "O priceId é obrigatório."))]
    #[schema(example = "price_1SIK6mFqUjYdOvCqVPk3Wpna")]
    pub price_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub url: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePortalPayload {
    #[validate(length(min = 1, message = "O customerId é obrigatório."))]
    pub customer_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PortalResponse {
    pub url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncSubscriptionPayload {
    #[validate(length(min = 1, message = "O sessionId é obrigatório."))]
    pub session_id: String,
}

// GET /api/plans
#[utoipa::path(
    get,
    path = "/api/plans",
    tag = "Billing",
    responses(
        (status = 200, description = "Catálogo de planos", body = Vec<Plan>)
    )
)]
pub async fn list_plans() -> Json<Vec<Plan>> {
    Json(all_plans())
}

// POST /api/billing/checkout
#[utoipa::path(
    post,
    path = "/api/billing/checkout",
    tag = "Billing",
    request_body = CreateCheckoutPayload,
    responses(
        (status = 200, description = "Sessão de checkout criada (7 dias de teste)", body = CheckoutResponse),
        (status = 502, description = "Falha na comunicação com o Stripe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_checkout(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateCheckoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let checkout = app_state
        .billing_service
        .start_checkout(&user, &payload.price_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(CheckoutResponse {
            url: checkout.url,
            session_id: checkout.session_id,
        }),
    ))
}

// POST /api/billing/portal
#[utoipa::path(
    post,
    path = "/api/billing/portal",
    tag = "Billing",
    request_body = CreatePortalPayload,
    responses(
        (status = 200, description = "Sessão do portal de assinatura criada", body = PortalResponse),
        (status = 502, description = "Falha na comunicação com o Stripe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_portal(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Json(payload): Json<CreatePortalPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let url = app_state.billing_service.open_portal(&payload.customer_id).await?;

    Ok((StatusCode::OK, Json(PortalResponse { url })))
}

// POST /api/billing/sync
//
// Confirmação pós-checkout: espelha a assinatura da sessão no banco.
// O webhook grava a mesma coisa; aqui é o caminho síncrono da tela de
// sucesso.
#[utoipa::path(
    post,
    path = "/api/billing/sync",
    tag = "Billing",
    request_body = SyncSubscriptionPayload,
    responses(
        (status = 200, description = "Assinatura sincronizada"),
        (status = 502, description = "Falha na comunicação com o Stripe")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_subscription(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SyncSubscriptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .billing_service
        .sync_from_session(user.id, &payload.session_id)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

// POST /api/billing/webhook
//
// Precisa do corpo BRUTO: a assinatura é calculada sobre os bytes exatos
// que o Stripe enviou.
#[utoipa::path(
    post,
    path = "/api/billing/webhook",
    tag = "Billing",
    responses(
        (status = 200, description = "Evento processado"),
        (status = 400, description = "Assinatura inválida")
    )
)]
pub async fn stripe_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::InvalidWebhookSignature)?;

    app_state
        .billing_service
        .handle_webhook(&body, signature, Utc::now().timestamp())
        .await?;

    Ok((StatusCode::OK, Json(json!({ "received": true }))))
}
