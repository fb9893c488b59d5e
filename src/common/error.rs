use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada falha de requisição vira uma variante tipada aqui — nada de
// adivinhar categoria a partir de texto de mensagem.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("E-mail não confirmado")]
    EmailNotConfirmed,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Despesa não encontrada")]
    ExpenseNotFound,

    #[error("Comissão não encontrada")]
    CommissionNotFound,

    #[error("Assinatura não encontrada")]
    SubscriptionNotFound,

    // Período de teste encerrado e sem assinatura ativa: modo somente leitura
    #[error("Período de teste expirado")]
    TrialExpired,

    #[error("Chave de mês inválida: {0}")]
    InvalidMonthKey(String),

    // Falha reportada pela API do Stripe (checkout, portal, consulta)
    #[error("Erro do Stripe: {0}")]
    StripeError(String),

    #[error("Assinatura de webhook inválida")]
    InvalidWebhookSignature,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::EmailNotConfirmed => (
                StatusCode::UNAUTHORIZED,
                "Por favor, confirme seu e-mail antes de fazer login.",
            ),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::ClientNotFound => (StatusCode::NOT_FOUND, "Cliente não encontrado."),
            AppError::ExpenseNotFound => (StatusCode::NOT_FOUND, "Despesa não encontrada."),
            AppError::CommissionNotFound => (StatusCode::NOT_FOUND, "Comissão não encontrada."),
            AppError::SubscriptionNotFound => (StatusCode::NOT_FOUND, "Nenhuma assinatura encontrada."),
            AppError::TrialExpired => (
                StatusCode::PAYMENT_REQUIRED,
                "Seu período de teste terminou. Assine um plano para continuar editando.",
            ),
            AppError::InvalidMonthKey(_) => (
                StatusCode::BAD_REQUEST,
                "Mês inválido. Use o formato YYYY-MM.",
            ),
            AppError::InvalidWebhookSignature => (
                StatusCode::BAD_REQUEST,
                "Assinatura de webhook inválida.",
            ),
            AppError::StripeError(ref msg) => {
                tracing::error!("Erro na API do Stripe: {}", msg);
                (StatusCode::BAD_GATEWAY, "Falha ao comunicar com o processador de pagamentos.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
