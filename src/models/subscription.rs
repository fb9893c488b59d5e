// src/models/subscription.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Dias de teste gratuito contados a partir do cadastro
pub const TRIAL_DAYS: i64 = 7;

// Sentinela de "nunca expira" para assinaturas ativas
pub const ACTIVE_DAYS_LEFT: i64 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "plan_id", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Starter,
    Pro,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trialing,
    Active,
    PastDue,
    Canceled,
    Incomplete,
}

impl SubscriptionStatus {
    // Converte o status textual reportado pela API do Stripe.
    // "incomplete_expired" e "unpaid" são tratados como incompleto.
    pub fn from_stripe(status: &str) -> Option<Self> {
        match status {
            "trialing" => Some(Self::Trialing),
            "active" => Some(Self::Active),
            "past_due" => Some(Self::PastDue),
            "canceled" => Some(Self::Canceled),
            "incomplete" | "incomplete_expired" | "unpaid" => Some(Self::Incomplete),
            _ => None,
        }
    }
}

// Espelho local da assinatura do Stripe (uma por usuário).
// Criada/atualizada pelos webhooks e pelo endpoint de sincronização.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,

    pub plan_id: PlanId,
    pub status: SubscriptionStatus,

    pub trial_ends_at: Option<DateTime<Utc>>,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Estado de acesso derivado (nunca persistido): recalculado a cada
// requisição a partir do cadastro do usuário + assinatura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrialInfo {
    pub days_left: i64,
    pub is_expired: bool,
    pub has_full_access: bool,
}

// Plano comercial exibido na tela de preços
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    // Preço mensal em reais
    pub price: u32,
    // Price ID do Stripe
    pub price_id: String,
    pub features: Vec<String>,
    // -1 = ilimitado
    pub max_clients: i32,
    pub popular: bool,
}

// Price IDs do Stripe (MODO TESTE)
const STARTER_PRICE_ID: &str = "price_1SIK6mFqUjYdOvCqVPk3Wpna";
const PRO_PRICE_ID: &str = "price_1SIK7kFqUjYdOvCqKEoV3SUV";
const PREMIUM_PRICE_ID: &str = "price_1SIK8DFqUjYdOvCqAhSlRy22";

// Tabela explícita price ID -> plano. Nada de casar substring: um price
// desconhecido retorna None e o chamador decide o fallback.
pub fn plan_for_price_id(price_id: &str) -> Option<PlanId> {
    match price_id {
        STARTER_PRICE_ID => Some(PlanId::Starter),
        PRO_PRICE_ID => Some(PlanId::Pro),
        PREMIUM_PRICE_ID => Some(PlanId::Premium),
        _ => None,
    }
}

pub fn plan(id: PlanId) -> Plan {
    match id {
        PlanId::Starter => Plan {
            id: PlanId::Starter,
            name: "Starter".to_string(),
            price: 29,
            price_id: STARTER_PRICE_ID.to_string(),
            features: vec![
                "Até 20 clientes".to_string(),
                "Dashboard completo".to_string(),
                "Gestão de vendedores".to_string(),
                "Controle de despesas".to_string(),
                "Suporte por email".to_string(),
            ],
            max_clients: 20,
            popular: false,
        },
        PlanId::Pro => Plan {
            id: PlanId::Pro,
            name: "Pro".to_string(),
            price: 49,
            price_id: PRO_PRICE_ID.to_string(),
            features: vec![
                "Até 50 clientes".to_string(),
                "Dashboard completo".to_string(),
                "Gestão de vendedores".to_string(),
                "Controle de despesas".to_string(),
                "Relatórios avançados".to_string(),
                "Suporte prioritário".to_string(),
            ],
            max_clients: 50,
            popular: true,
        },
        PlanId::Premium => Plan {
            id: PlanId::Premium,
            name: "Premium".to_string(),
            price: 99,
            price_id: PREMIUM_PRICE_ID.to_string(),
            features: vec![
                "Clientes ilimitados".to_string(),
                "Dashboard completo".to_string(),
                "Gestão de vendedores".to_string(),
                "Controle de despesas".to_string(),
                "Relatórios avançados".to_string(),
                "Suporte VIP 24/7".to_string(),
                "Acesso antecipado a novidades".to_string(),
            ],
            max_clients: -1,
            popular: false,
        },
    }
}

pub fn all_plans() -> Vec<Plan> {
    vec![plan(PlanId::Starter), plan(PlanId::Pro), plan(PlanId::Premium)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_id_lookup_is_exact() {
        assert_eq!(plan_for_price_id(STARTER_PRICE_ID), Some(PlanId::Starter));
        assert_eq!(plan_for_price_id(PRO_PRICE_ID), Some(PlanId::Pro));
        assert_eq!(plan_for_price_id(PREMIUM_PRICE_ID), Some(PlanId::Premium));
        // Fragmento de um price real não basta
        assert_eq!(plan_for_price_id("price_1SIK7k"), None);
        assert_eq!(plan_for_price_id(""), None);
    }

    #[test]
    fn stripe_status_parsing() {
        assert_eq!(SubscriptionStatus::from_stripe("active"), Some(SubscriptionStatus::Active));
        assert_eq!(SubscriptionStatus::from_stripe("past_due"), Some(SubscriptionStatus::PastDue));
        assert_eq!(
            SubscriptionStatus::from_stripe("incomplete_expired"),
            Some(SubscriptionStatus::Incomplete)
        );
        assert_eq!(SubscriptionStatus::from_stripe("paused"), None);
    }
}
