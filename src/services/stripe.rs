// src/services/stripe.rs

use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;

use crate::common::error::AppError;

type HmacSha256 = Hmac<Sha256>;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

// Tolerância entre o timestamp assinado e o relógio local (mesma janela
// que a biblioteca oficial do Stripe usa)
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

// --- Respostas da API (só os campos que usamos) ---

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    pub customer: Option<String>,
    pub subscription: Option<String>,
    pub client_reference_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PortalSession {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    pub status: String,
    pub customer: String,
    pub items: StripeList,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    pub trial_end: Option<i64>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

#[derive(Debug, Deserialize)]
pub struct StripeList {
    pub data: Vec<StripeSubscriptionItem>,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscriptionItem {
    pub price: StripePrice,
}

#[derive(Debug, Deserialize)]
pub struct StripePrice {
    pub id: String,
}

// Evento entregue no webhook
#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

// Cliente fino da API do Stripe: chamadas form-encoded + verificação de
// assinatura de webhook. Nenhum retry automático — falha é terminal para
// a ação do usuário.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: String,
}

impl StripeClient {
    pub fn new(secret_key: String, webhook_secret: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            webhook_secret,
        }
    }

    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        user_id: &str,
        user_email: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession, AppError> {
        let params = [
            ("payment_method_types[0]", "card"),
            ("line_items[0][price]", price_id),
            ("line_items[0][quantity]", "1"),
            ("mode", "subscription"),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("customer_email", user_email),
            ("client_reference_id", user_id),
            ("subscription_data[trial_period_days]", "7"),
            ("allow_promotion_codes", "true"),
        ];

        self.post_form("/checkout/sessions", &params).await
    }

    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, AppError> {
        let params = [("customer", customer_id), ("return_url", return_url)];
        self.post_form("/billing_portal/sessions", &params).await
    }

    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, AppError> {
        self.get(&format!("/checkout/sessions/{session_id}")).await
    }

    pub async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<StripeSubscription, AppError> {
        self.get(&format!("/subscriptions/{subscription_id}")).await
    }

    // Valida o cabeçalho "stripe-signature" ("t=...,v1=...") contra o corpo
    // bruto da requisição. `now` vem do chamador.
    pub fn verify_webhook_signature(
        &self,
        payload: &str,
        signature_header: &str,
        now: i64,
    ) -> Result<(), AppError> {
        verify_signature(&self.webhook_secret, payload, signature_header, now)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .post(format!("{STRIPE_API_BASE}{path}"))
            .bearer_auth(&self.secret_key)
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::StripeError(e.to_string()))?;

        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self
            .http
            .get(format!("{STRIPE_API_BASE}{path}"))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::StripeError(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
        let status = response.status();

        if !status.is_success() {
            // Tenta extrair a mensagem do corpo de erro padrão do Stripe
            let message = match response.json::<StripeErrorBody>().await {
                Ok(body) => body.error.message.unwrap_or_else(|| status.to_string()),
                Err(_) => status.to_string(),
            };
            return Err(AppError::StripeError(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::StripeError(format!("resposta inesperada: {e}")))
    }
}

// Verificação pura, separada do cliente para ser testável sem rede.
// Esquema v1 do Stripe: HMAC-SHA256(secret, "{t}.{payload}") em hex.
fn verify_signature(
    secret: &str,
    payload: &str,
    signature_header: &str,
    now: i64,
) -> Result<(), AppError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(AppError::InvalidWebhookSignature)?;
    if candidates.is_empty() {
        return Err(AppError::InvalidWebhookSignature);
    }

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(AppError::InvalidWebhookSignature);
    }

    let signed_payload = format!("{timestamp}.{payload}");
    let expected = hmac_sha256_hex(secret, &signed_payload);

    if candidates.iter().any(|c| constant_time_eq(&expected, c)) {
        Ok(())
    } else {
        Err(AppError::InvalidWebhookSignature)
    }
}

fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    // HMAC-SHA256 aceita chave de qualquer tamanho (RFC 2104)
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 aceita qualquer tamanho de chave");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

// Comparação em tempo constante para não vazar o prefixo correto
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const PAYLOAD: &str = r#"{"type":"checkout.session.completed"}"#;

    fn signed_header(timestamp: i64) -> String {
        let signature = hmac_sha256_hex(SECRET, &format!("{timestamp}.{PAYLOAD}"));
        format!("t={timestamp},v1={signature}")
    }

    #[test]
    fn valid_signature_passes() {
        let header = signed_header(1_700_000_000);
        assert!(verify_signature(SECRET, PAYLOAD, &header, 1_700_000_000).is_ok());
    }

    #[test]
    fn tampered_payload_fails() {
        let header = signed_header(1_700_000_000);
        let tampered = r#"{"type":"customer.subscription.deleted"}"#;
        assert!(verify_signature(SECRET, tampered, &header, 1_700_000_000).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let header = signed_header(1_700_000_000);
        assert!(verify_signature("whsec_outro", PAYLOAD, &header, 1_700_000_000).is_err());
    }

    #[test]
    fn stale_timestamp_fails() {
        let header = signed_header(1_700_000_000);
        let too_late = 1_700_000_000 + SIGNATURE_TOLERANCE_SECS + 1;
        assert!(verify_signature(SECRET, PAYLOAD, &header, too_late).is_err());
    }

    #[test]
    fn malformed_header_fails() {
        for header in ["", "t=abc", "v1=deadbeef", "t=123"] {
            assert!(
                verify_signature(SECRET, PAYLOAD, header, 123).is_err(),
                "aceitou {header:?}"
            );
        }
    }

    #[test]
    fn extra_v1_candidates_are_accepted() {
        // Stripe envia múltiplos v1 durante rotação de segredo
        let timestamp = 1_700_000_000;
        let good = hmac_sha256_hex(SECRET, &format!("{timestamp}.{PAYLOAD}"));
        let header = format!("t={timestamp},v1={bad},v1={good}", bad = "0".repeat(64));
        assert!(verify_signature(SECRET, PAYLOAD, &header, timestamp).is_ok());
    }
}
