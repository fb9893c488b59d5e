// src/db/commission_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::financial::{CommissionStatus, SellerCommissionRecord},
};

#[derive(Clone)]
pub struct CommissionRepository {
    pool: PgPool,
}

impl CommissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self, user_id: Uuid) -> Result<Vec<SellerCommissionRecord>, AppError> {
        let records = sqlx::query_as::<_, SellerCommissionRecord>(
            "SELECT * FROM seller_commissions WHERE user_id = $1 ORDER BY month DESC, client_name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn get_by_month<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        month: &str,
    ) -> Result<Vec<SellerCommissionRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, SellerCommissionRecord>(
            "SELECT * FROM seller_commissions WHERE user_id = $1 AND month = $2 ORDER BY client_name ASC",
        )
        .bind(user_id)
        .bind(month)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    // Registro de um cliente em um mês (no máximo um, pela chave derivada)
    pub async fn find_for_client_month<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        client_id: Uuid,
        month: &str,
    ) -> Result<Option<SellerCommissionRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, SellerCommissionRecord>(
            "SELECT * FROM seller_commissions WHERE user_id = $1 AND client_id = $2 AND month = $3",
        )
        .bind(user_id)
        .bind(client_id)
        .bind(month)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        record: &SellerCommissionRecord,
    ) -> Result<SellerCommissionRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, SellerCommissionRecord>(
            r#"
            INSERT INTO seller_commissions (
                id, user_id, client_id, client_name, seller_name,
                commission_value, payment_status, month, paid_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&record.id)
        .bind(record.user_id)
        .bind(record.client_id)
        .bind(&record.client_name)
        .bind(&record.seller_name)
        .bind(record.commission_value)
        .bind(record.payment_status)
        .bind(&record.month)
        .bind(record.paid_date)
        .fetch_one(executor)
        .await?;

        Ok(inserted)
    }

    // Refresca apenas valor e nomes desnormalizados.
    // payment_status e paid_date nunca são tocados por aqui.
    pub async fn update_values<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: &str,
        client_name: &str,
        seller_name: &str,
        commission_value: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE seller_commissions
            SET client_name = $3, seller_name = $4, commission_value = $5
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(client_name)
        .bind(seller_name)
        .bind(commission_value)
        .execute(executor)
        .await?;

        Ok(())
    }

    // Alterna pendente <-> pago (paid_date acompanha o status)
    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: &str,
        status: CommissionStatus,
        paid_date: Option<DateTime<Utc>>,
    ) -> Result<SellerCommissionRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, SellerCommissionRecord>(
            r#"
            UPDATE seller_commissions
            SET payment_status = $3, paid_date = $4
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(status)
        .bind(paid_date)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::CommissionNotFound)?;

        Ok(record)
    }

    pub async fn delete_for_client_month<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        client_id: Uuid,
        month: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "DELETE FROM seller_commissions WHERE user_id = $1 AND client_id = $2 AND month = $3",
        )
        .bind(user_id)
        .bind(client_id)
        .bind(month)
        .execute(executor)
        .await?;

        Ok(())
    }

    // Cascata na exclusão do cliente
    pub async fn delete_for_client<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        client_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM seller_commissions WHERE user_id = $1 AND client_id = $2")
            .bind(user_id)
            .bind(client_id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
