// src/db/subscription_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::subscription::{PlanId, Subscription, SubscriptionStatus},
};

// Campos espelhados do Stripe em um upsert/update de assinatura
pub struct SubscriptionUpsert {
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
}

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Subscription>, AppError> {
        let subscription = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    // Upsert chaveado por user_id: é assim que o webhook de checkout e o
    // endpoint de sincronização gravam, uma assinatura por usuário.
    pub async fn upsert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        data: &SubscriptionUpsert,
    ) -> Result<Subscription, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (
                user_id, stripe_customer_id, stripe_subscription_id,
                plan_id, status, trial_ends_at,
                current_period_start, current_period_end, cancel_at_period_end
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                stripe_customer_id = EXCLUDED.stripe_customer_id,
                stripe_subscription_id = EXCLUDED.stripe_subscription_id,
                plan_id = EXCLUDED.plan_id,
                status = EXCLUDED.status,
                trial_ends_at = EXCLUDED.trial_ends_at,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end,
                cancel_at_period_end = EXCLUDED.cancel_at_period_end,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&data.stripe_customer_id)
        .bind(&data.stripe_subscription_id)
        .bind(data.plan_id)
        .bind(data.status)
        .bind(data.trial_ends_at)
        .bind(data.current_period_start)
        .bind(data.current_period_end)
        .bind(data.cancel_at_period_end)
        .fetch_one(executor)
        .await?;

        Ok(subscription)
    }

    // Espelha customer.subscription.updated (chaveado pelo id do Stripe)
    pub async fn update_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
        status: SubscriptionStatus,
        current_period_start: Option<DateTime<Utc>>,
        current_period_end: Option<DateTime<Utc>>,
        cancel_at_period_end: bool,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = $2,
                current_period_start = $3,
                current_period_end = $4,
                cancel_at_period_end = $5,
                updated_at = now()
            WHERE stripe_subscription_id = $1
            "#,
        )
        .bind(stripe_subscription_id)
        .bind(status)
        .bind(current_period_start)
        .bind(current_period_end)
        .bind(cancel_at_period_end)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // Espelha customer.subscription.deleted
    pub async fn mark_canceled_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = $2, updated_at = now()
            WHERE stripe_subscription_id = $1
            "#,
        )
        .bind(stripe_subscription_id)
        .bind(SubscriptionStatus::Canceled)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
