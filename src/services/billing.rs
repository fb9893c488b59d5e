// src/services/billing.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{subscription_repo::SubscriptionUpsert, SubscriptionRepository},
    models::auth::User,
    models::subscription::{plan_for_price_id, PlanId, Subscription, SubscriptionStatus},
    services::stripe::{CheckoutSession, StripeClient, StripeEvent, StripeSubscription},
};

#[derive(Clone)]
pub struct BillingService {
    stripe: StripeClient,
    subscription_repo: SubscriptionRepository,
    pool: PgPool,
    // Origem do app web, base das URLs de retorno do Stripe
    base_url: String,
}

pub struct CheckoutStarted {
    pub url: String,
    pub session_id: String,
}

impl BillingService {
    pub fn new(
        stripe: StripeClient,
        subscription_repo: SubscriptionRepository,
        pool: PgPool,
        base_url: String,
    ) -> Self {
        Self { stripe, subscription_repo, pool, base_url }
    }

    pub async fn find_subscription(&self, user_id: Uuid) -> Result<Option<Subscription>, AppError> {
        self.subscription_repo.find_by_user(user_id).await
    }

    // Abre uma sessão de checkout (assinatura com 7 dias de teste)
    pub async fn start_checkout(
        &self,
        user: &User,
        price_id: &str,
    ) -> Result<CheckoutStarted, AppError> {
        let success_url =
            format!("{}/subscription-success?session_id={{CHECKOUT_SESSION_ID}}", self.base_url);
        let cancel_url = format!("{}/pricing", self.base_url);

        let session = self
            .stripe
            .create_checkout_session(
                price_id,
                &user.id.to_string(),
                &user.email,
                &success_url,
                &cancel_url,
            )
            .await?;

        let url = session
            .url
            .ok_or_else(|| AppError::StripeError("sessão de checkout sem URL".to_string()))?;

        Ok(CheckoutStarted { url, session_id: session.id })
    }

    // Abre o portal de gerenciamento da assinatura
    pub async fn open_portal(&self, customer_id: &str) -> Result<String, AppError> {
        let return_url = format!("{}/dashboard", self.base_url);
        let session = self
            .stripe
            .create_portal_session(customer_id, &return_url)
            .await?;
        Ok(session.url)
    }

    // Confirmação pós-checkout: busca a sessão no Stripe e espelha a
    // assinatura no banco (o webhook faz o mesmo; o último a chegar vence).
    pub async fn sync_from_session(
        &self,
        user_id: Uuid,
        session_id: &str,
    ) -> Result<Subscription, AppError> {
        let session = self.stripe.retrieve_checkout_session(session_id).await?;

        let subscription_id = session
            .subscription
            .ok_or_else(|| AppError::StripeError("sessão sem assinatura vinculada".to_string()))?;

        let stripe_subscription = self.stripe.retrieve_subscription(&subscription_id).await?;

        self.upsert_from_stripe(user_id, session.customer, &stripe_subscription)
            .await
    }

    // Processa um evento de webhook já com o corpo bruto em mãos
    pub async fn handle_webhook(
        &self,
        payload: &str,
        signature_header: &str,
        now: i64,
    ) -> Result<(), AppError> {
        self.stripe
            .verify_webhook_signature(payload, signature_header, now)?;

        let event: StripeEvent = serde_json::from_str(payload)
            .map_err(|e| anyhow::anyhow!("payload de webhook ilegível: {e}"))?;

        tracing::info!("🔔 Webhook do Stripe: {}", event.event_type);

        match event.event_type.as_str() {
            "checkout.session.completed" => {
                let session: CheckoutSession = serde_json::from_value(event.data.object)
                    .map_err(|e| anyhow::anyhow!("checkout.session malformada: {e}"))?;
                self.handle_checkout_completed(session).await?;
            }
            "customer.subscription.updated" => {
                let subscription: StripeSubscription = serde_json::from_value(event.data.object)
                    .map_err(|e| anyhow::anyhow!("subscription malformada: {e}"))?;
                self.handle_subscription_updated(subscription).await?;
            }
            "customer.subscription.deleted" => {
                let subscription: StripeSubscription = serde_json::from_value(event.data.object)
                    .map_err(|e| anyhow::anyhow!("subscription malformada: {e}"))?;
                self.subscription_repo
                    .mark_canceled_by_stripe_id(&subscription.id)
                    .await?;
                tracing::info!("✅ Assinatura {} cancelada.", subscription.id);
            }
            other => {
                tracing::debug!("Evento de webhook ignorado: {}", other);
            }
        }

        Ok(())
    }

    async fn handle_checkout_completed(&self, session: CheckoutSession) -> Result<(), AppError> {
        let user_id: Uuid = session
            .client_reference_id
            .as_deref()
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| anyhow::anyhow!("checkout sem client_reference_id válido"))?;

        let subscription_id = session
            .subscription
            .ok_or_else(|| anyhow::anyhow!("checkout concluído sem assinatura"))?;

        // A sessão não carrega o price nem os períodos: busca a assinatura
        let stripe_subscription = self.stripe.retrieve_subscription(&subscription_id).await?;

        self.upsert_from_stripe(user_id, session.customer, &stripe_subscription)
            .await?;

        tracing::info!("✅ Assinatura salva para o usuário {}.", user_id);
        Ok(())
    }

    async fn handle_subscription_updated(
        &self,
        subscription: StripeSubscription,
    ) -> Result<(), AppError> {
        let status = parse_status(&subscription.status);

        self.subscription_repo
            .update_by_stripe_id(
                &subscription.id,
                status,
                epoch_to_datetime(subscription.current_period_start),
                epoch_to_datetime(subscription.current_period_end),
                subscription.cancel_at_period_end,
            )
            .await?;

        tracing::info!("✅ Assinatura {} atualizada ({:?}).", subscription.id, status);
        Ok(())
    }

    async fn upsert_from_stripe(
        &self,
        user_id: Uuid,
        customer_id: Option<String>,
        subscription: &StripeSubscription,
    ) -> Result<Subscription, AppError> {
        let price_id = subscription
            .items
            .data
            .first()
            .map(|item| item.price.id.as_str())
            .unwrap_or_default();

        let plan_id = plan_for_price_id(price_id).unwrap_or_else(|| {
            tracing::warn!("Price desconhecido '{}', assumindo plano starter.", price_id);
            PlanId::Starter
        });

        let data = SubscriptionUpsert {
            stripe_customer_id: customer_id.or_else(|| Some(subscription.customer.clone())),
            stripe_subscription_id: Some(subscription.id.clone()),
            plan_id,
            status: parse_status(&subscription.status),
            trial_ends_at: epoch_to_datetime(subscription.trial_end),
            current_period_start: epoch_to_datetime(subscription.current_period_start),
            current_period_end: epoch_to_datetime(subscription.current_period_end),
            cancel_at_period_end: subscription.cancel_at_period_end,
        };

        self.subscription_repo.upsert(&self.pool, user_id, &data).await
    }
}

fn parse_status(status: &str) -> SubscriptionStatus {
    SubscriptionStatus::from_stripe(status).unwrap_or_else(|| {
        tracing::warn!("Status de assinatura desconhecido '{}', tratando como incompleto.", status);
        SubscriptionStatus::Incomplete
    })
}

fn epoch_to_datetime(epoch: Option<i64>) -> Option<DateTime<Utc>> {
    epoch.and_then(|seconds| DateTime::from_timestamp(seconds, 0))
}
