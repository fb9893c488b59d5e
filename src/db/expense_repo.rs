// src/db/expense_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::financial::AgencyExpense};

// Despesas da agência: CRUD simples, sempre escopado pelo usuário
#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self, user_id: Uuid) -> Result<Vec<AgencyExpense>, AppError> {
        let expenses = sqlx::query_as::<_, AgencyExpense>(
            "SELECT * FROM agency_expenses WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        description: &str,
        value: Decimal,
        category: &str,
    ) -> Result<AgencyExpense, AppError> {
        let expense = sqlx::query_as::<_, AgencyExpense>(
            r#"
            INSERT INTO agency_expenses (user_id, description, value, category)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(description)
        .bind(value)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        description: &str,
        value: Decimal,
        category: &str,
    ) -> Result<AgencyExpense, AppError> {
        let expense = sqlx::query_as::<_, AgencyExpense>(
            r#"
            UPDATE agency_expenses
            SET description = $3, value = $4, category = $5
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(description)
        .bind(value)
        .bind(category)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ExpenseNotFound)?;

        Ok(expense)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM agency_expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ExpenseNotFound);
        }

        Ok(())
    }
}
