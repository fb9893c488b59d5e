// src/middleware/access.rs

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::User,
    services::access::compute_trial_info,
};

// Porteiro do modo somente leitura: com o teste expirado e sem assinatura
// ativa, leituras continuam passando mas qualquer mutação leva 402.
// O estado de acesso é recalculado a cada requisição — nada fica cacheado.
pub async fn access_guard(
    State(app_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Roda depois do auth_guard, que já colocou o usuário nas extensions
    let user = request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    let is_mutation = request.method() != Method::GET && request.method() != Method::HEAD;

    if is_mutation {
        let subscription = app_state.billing_service.find_subscription(user.id).await?;
        let trial = compute_trial_info(Utc::now(), Some(user.created_at), subscription.as_ref());

        if !trial.has_full_access {
            return Err(AppError::TrialExpired);
        }
    }

    Ok(next.run(request).await)
}
