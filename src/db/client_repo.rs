// src/db/client_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::financial::Client};

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self, user_id: Uuid) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE user_id = $1 ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    // Insere o cliente já montado pelo serviço (id gerado lá, junto com a
    // comissão do mês, para caberem na mesma transação)
    pub async fn insert<'e, E>(&self, executor: E, client: &Client) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (
                id, user_id, name, monthly_value, payment_date, payment_status,
                seller_name, seller_commission, extra_expenses,
                contract_start_date, first_payment_month, last_payment_month
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(client.user_id)
        .bind(&client.name)
        .bind(client.monthly_value)
        .bind(client.payment_date)
        .bind(client.payment_status)
        .bind(&client.seller_name)
        .bind(client.seller_commission)
        .bind(&client.extra_expenses)
        .bind(client.contract_start_date)
        .bind(&client.first_payment_month)
        .bind(&client.last_payment_month)
        .fetch_one(executor)
        .await?;

        Ok(inserted)
    }

    // Atualização completa (o serviço já mesclou o payload no registro atual)
    pub async fn update<'e, E>(&self, executor: E, client: &Client) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients SET
                name = $3,
                monthly_value = $4,
                payment_date = $5,
                payment_status = $6,
                seller_name = $7,
                seller_commission = $8,
                extra_expenses = $9,
                contract_start_date = $10,
                first_payment_month = $11,
                last_payment_month = $12,
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(client.user_id)
        .bind(&client.name)
        .bind(client.monthly_value)
        .bind(client.payment_date)
        .bind(client.payment_status)
        .bind(&client.seller_name)
        .bind(client.seller_commission)
        .bind(&client.extra_expenses)
        .bind(client.contract_start_date)
        .bind(&client.first_payment_month)
        .bind(&client.last_payment_month)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ClientNotFound)?;

        Ok(updated)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ClientNotFound);
        }

        Ok(())
    }
}
