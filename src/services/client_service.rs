// src/services/client_service.rs

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::month::month_key,
    db::{ClientRepository, CommissionRepository},
    models::financial::{Client, PaymentStatus},
    services::commission::{plan_sync, CommissionSync},
};

// Orquestra as mutações de cliente. Toda operação que mexe no cliente E na
// comissão do mês roda dentro de uma única transação: se o segundo passo
// falhar, o primeiro é desfeito junto.
#[derive(Clone)]
pub struct ClientService {
    client_repo: ClientRepository,
    commission_repo: CommissionRepository,
    pool: PgPool,
}

impl ClientService {
    pub fn new(
        client_repo: ClientRepository,
        commission_repo: CommissionRepository,
        pool: PgPool,
    ) -> Self {
        Self { client_repo, commission_repo, pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Client>, AppError> {
        self.client_repo.get_all(user_id).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Client, AppError> {
        self.client_repo
            .find_by_id(&self.pool, user_id, id)
            .await?
            .ok_or(AppError::ClientNotFound)
    }

    // Cria o cliente; se já entrar como pago, a comissão do mês corrente
    // nasce na mesma transação.
    pub async fn create(&self, client: Client) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = self.client_repo.insert(&mut *tx, &client).await?;
        self.sync_commission(&mut tx, &created).await?;

        tx.commit().await?;
        Ok(created)
    }

    // Atualização completa + sincronização da comissão do mês corrente
    // (criar, refrescar ou remover, conforme o status de pagamento).
    pub async fn update(&self, client: Client) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = self.client_repo.update(&mut *tx, &client).await?;
        self.sync_commission(&mut tx, &updated).await?;

        tx.commit().await?;
        Ok(updated)
    }

    // Marca a mensalidade do mês corrente como quitada
    pub async fn mark_paid(&self, user_id: Uuid, id: Uuid) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut client = self
            .client_repo
            .find_by_id(&mut *tx, user_id, id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        client.last_payment_month = Some(month_key(Utc::now().date_naive()));
        client.payment_status = PaymentStatus::Paid;

        let updated = self.client_repo.update(&mut *tx, &client).await?;
        self.sync_commission(&mut tx, &updated).await?;

        tx.commit().await?;
        Ok(updated)
    }

    // Exclui o cliente e, em cascata, todas as comissões dele
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.commission_repo
            .delete_for_client(&mut *tx, user_id, id)
            .await?;
        self.client_repo.delete(&mut *tx, user_id, id).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn sync_commission(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        client: &Client,
    ) -> Result<(), AppError> {
        let month = month_key(Utc::now().date_naive());

        let existing = self
            .commission_repo
            .find_for_client_month(&mut **tx, client.user_id, client.id, &month)
            .await?;

        match plan_sync(client, &month, existing.as_ref()) {
            CommissionSync::Insert(record) => {
                self.commission_repo.insert(&mut **tx, &record).await?;
            }
            CommissionSync::Update(record) => {
                self.commission_repo
                    .update_values(
                        &mut **tx,
                        record.user_id,
                        &record.id,
                        &record.client_name,
                        &record.seller_name,
                        record.commission_value,
                    )
                    .await?;
            }
            CommissionSync::Remove => {
                self.commission_repo
                    .delete_for_client_month(&mut **tx, client.user_id, client.id, &month)
                    .await?;
            }
            CommissionSync::Noop => {}
        }

        Ok(())
    }
}
