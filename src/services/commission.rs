// src/services/commission.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::month::validate_month_key,
    db::{ClientRepository, CommissionRepository},
    models::financial::{Client, CommissionStatus, PaymentStatus, SellerCommissionRecord},
};

// Sentinela para cliente sem vendedor vinculado
pub const NO_SELLER: &str = "Sem vendedor";

// --- Motor puro de geração ---

pub fn commission_value(client: &Client) -> Decimal {
    client.monthly_value * client.seller_commission / Decimal::ONE_HUNDRED
}

fn seller_display(client: &Client) -> String {
    if client.seller_name.is_empty() {
        NO_SELLER.to_string()
    } else {
        client.seller_name.clone()
    }
}

// Monta o registro de comissão de um cliente para um mês.
// O id derivado "{client_id}-{month}" garante unicidade por cliente/mês.
pub fn commission_for_client(client: &Client, month: &str) -> SellerCommissionRecord {
    SellerCommissionRecord {
        id: format!("{}-{}", client.id, month),
        user_id: client.user_id,
        client_id: client.id,
        client_name: client.name.clone(),
        seller_name: seller_display(client),
        commission_value: commission_value(client),
        payment_status: CommissionStatus::Pending,
        month: month.to_string(),
        paid_date: None,
        created_at: None,
    }
}

fn values_differ(record: &SellerCommissionRecord, client: &Client) -> bool {
    record.commission_value != commission_value(client)
        || record.client_name != client.name
        || record.seller_name != seller_display(client)
}

#[derive(Debug, Default)]
pub struct CommissionDiff {
    pub to_insert: Vec<SellerCommissionRecord>,
    pub to_update: Vec<SellerCommissionRecord>,
}

impl CommissionDiff {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_update.is_empty()
    }
}

/// Gera as comissões de um mês a partir dos clientes pagos.
///
/// Clientes pagos sem registro no mês entram em `to_insert`; os que já
/// têm registro só entram em `to_update` se valor ou nomes mudaram
/// (status e paid_date de registros existentes nunca são tocados).
/// Rodar duas vezes com os mesmos dados produz um diff vazio.
pub fn generate_for_month(
    month: &str,
    clients: &[Client],
    existing: &[SellerCommissionRecord],
) -> CommissionDiff {
    let mut diff = CommissionDiff::default();

    for client in clients.iter().filter(|c| c.payment_status == PaymentStatus::Paid) {
        let current = existing
            .iter()
            .find(|r| r.client_id == client.id && r.month == month);

        match current {
            None => diff.to_insert.push(commission_for_client(client, month)),
            Some(record) if values_differ(record, client) => {
                let mut refreshed = record.clone();
                refreshed.client_name = client.name.clone();
                refreshed.seller_name = seller_display(client);
                refreshed.commission_value = commission_value(client);
                diff.to_update.push(refreshed);
            }
            Some(_) => {}
        }
    }

    diff
}

// Decisão de sincronização de UM cliente após mutação (criar, editar,
// marcar pago, reverter): mantém o registro do mês coerente com o cliente.
#[derive(Debug)]
pub enum CommissionSync {
    Insert(SellerCommissionRecord),
    Update(SellerCommissionRecord),
    Remove,
    Noop,
}

pub fn plan_sync(
    client: &Client,
    month: &str,
    existing: Option<&SellerCommissionRecord>,
) -> CommissionSync {
    if client.payment_status == PaymentStatus::Paid {
        match existing {
            None => CommissionSync::Insert(commission_for_client(client, month)),
            Some(record) if values_differ(record, client) => {
                let mut refreshed = record.clone();
                refreshed.client_name = client.name.clone();
                refreshed.seller_name = seller_display(client);
                refreshed.commission_value = commission_value(client);
                CommissionSync::Update(refreshed)
            }
            Some(_) => CommissionSync::Noop,
        }
    } else if existing.is_some() {
        // Cliente deixou de estar pago: remove a comissão do mês
        CommissionSync::Remove
    } else {
        CommissionSync::Noop
    }
}

// --- Serviço (persistência do diff em uma transação) ---

#[derive(Clone)]
pub struct CommissionService {
    client_repo: ClientRepository,
    commission_repo: CommissionRepository,
    pool: PgPool,
}

impl CommissionService {
    pub fn new(
        client_repo: ClientRepository,
        commission_repo: CommissionRepository,
        pool: PgPool,
    ) -> Self {
        Self { client_repo, commission_repo, pool }
    }

    // Gera/atualiza as comissões do mês e devolve a lista completa.
    // Inserções e atualizações entram na mesma transação.
    pub async fn generate_for_month(
        &self,
        user_id: Uuid,
        month: &str,
    ) -> Result<Vec<SellerCommissionRecord>, AppError> {
        validate_month_key(month)?;

        let clients = self.client_repo.get_all(user_id).await?;
        let existing = self
            .commission_repo
            .get_by_month(&self.pool, user_id, month)
            .await?;

        let diff = generate_for_month(month, &clients, &existing);

        if !diff.is_empty() {
            let mut tx = self.pool.begin().await?;

            for record in &diff.to_insert {
                self.commission_repo.insert(&mut *tx, record).await?;
            }
            for record in &diff.to_update {
                self.commission_repo
                    .update_values(
                        &mut *tx,
                        user_id,
                        &record.id,
                        &record.client_name,
                        &record.seller_name,
                        record.commission_value,
                    )
                    .await?;
            }

            tx.commit().await?;

            tracing::info!(
                "💰 Comissões de {}: {} criadas, {} atualizadas.",
                month,
                diff.to_insert.len(),
                diff.to_update.len()
            );
        }

        self.commission_repo.get_by_month(&self.pool, user_id, month).await
    }

    pub async fn list_by_month(
        &self,
        user_id: Uuid,
        month: &str,
    ) -> Result<Vec<SellerCommissionRecord>, AppError> {
        validate_month_key(month)?;
        self.commission_repo.get_by_month(&self.pool, user_id, month).await
    }

    pub async fn list_all(&self, user_id: Uuid) -> Result<Vec<SellerCommissionRecord>, AppError> {
        self.commission_repo.get_all(user_id).await
    }

    // Alterna o status de pagamento da comissão.
    // Marcar como paga registra o momento; voltar para pendente limpa.
    pub async fn set_status(
        &self,
        user_id: Uuid,
        id: &str,
        status: CommissionStatus,
    ) -> Result<SellerCommissionRecord, AppError> {
        let paid_date = match status {
            CommissionStatus::Paid => Some(Utc::now()),
            CommissionStatus::Pending => None,
        };

        self.commission_repo
            .set_status(&self.pool, user_id, id, status, paid_date)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn client(name: &str, monthly_value: i64, commission_pct: i64, status: PaymentStatus) -> Client {
        Client {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            monthly_value: Decimal::from(monthly_value),
            payment_date: 10,
            payment_status: status,
            seller_name: "João".to_string(),
            seller_commission: Decimal::from(commission_pct),
            extra_expenses: Json(vec![]),
            contract_start_date: None,
            first_payment_month: None,
            last_payment_month: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn commission_value_is_percentage_of_monthly_value() {
        let c = client("Padaria", 1000, 10, PaymentStatus::Paid);
        assert_eq!(commission_value(&c), Decimal::from(100));
    }

    #[test]
    fn generates_pending_commission_for_paid_clients_only() {
        let clients = vec![
            client("Pago", 1000, 10, PaymentStatus::Paid),
            client("Pendente", 2000, 10, PaymentStatus::Pending),
            client("Atrasado", 3000, 10, PaymentStatus::Overdue),
        ];

        let diff = generate_for_month("2026-03", &clients, &[]);
        assert_eq!(diff.to_insert.len(), 1);
        assert!(diff.to_update.is_empty());

        let record = &diff.to_insert[0];
        assert_eq!(record.client_name, "Pago");
        assert_eq!(record.commission_value, Decimal::from(100));
        assert_eq!(record.payment_status, CommissionStatus::Pending);
        assert_eq!(record.month, "2026-03");
        assert_eq!(record.id, format!("{}-2026-03", record.client_id));
    }

    #[test]
    fn empty_seller_name_becomes_sentinel() {
        let mut c = client("Solo", 500, 20, PaymentStatus::Paid);
        c.seller_name = String::new();

        let diff = generate_for_month("2026-03", &[c], &[]);
        assert_eq!(diff.to_insert[0].seller_name, NO_SELLER);
    }

    #[test]
    fn generation_is_idempotent() {
        let clients = vec![
            client("A", 1000, 10, PaymentStatus::Paid),
            client("B", 2500, 15, PaymentStatus::Paid),
        ];

        let first = generate_for_month("2026-03", &clients, &[]);
        assert_eq!(first.to_insert.len(), 2);

        // Segunda rodada com os registros recém-gerados: nada a fazer
        let second = generate_for_month("2026-03", &clients, &first.to_insert);
        assert!(second.is_empty());
    }

    #[test]
    fn changed_value_refreshes_record_but_not_payment_fields() {
        let mut c = client("Cresceu", 1000, 10, PaymentStatus::Paid);
        let mut record = commission_for_client(&c, "2026-03");
        record.payment_status = CommissionStatus::Paid;
        record.paid_date = Some(Utc::now());

        c.monthly_value = Decimal::from(2000);

        let diff = generate_for_month("2026-03", &[c], std::slice::from_ref(&record));
        assert!(diff.to_insert.is_empty());
        assert_eq!(diff.to_update.len(), 1);

        let refreshed = &diff.to_update[0];
        assert_eq!(refreshed.commission_value, Decimal::from(200));
        // Campos de pagamento preservados
        assert_eq!(refreshed.payment_status, CommissionStatus::Paid);
        assert!(refreshed.paid_date.is_some());
    }

    #[test]
    fn existing_record_of_other_month_does_not_block_insert() {
        let c = client("Mensal", 1000, 10, PaymentStatus::Paid);
        let february = commission_for_client(&c, "2026-02");

        let diff = generate_for_month("2026-03", std::slice::from_ref(&c), &[february]);
        assert_eq!(diff.to_insert.len(), 1);
        assert_eq!(diff.to_insert[0].month, "2026-03");
    }

    #[test]
    fn sync_round_trip_removes_the_record() {
        let mut c = client("Vai e volta", 1000, 10, PaymentStatus::Paid);

        // Marcado como pago: insere
        let CommissionSync::Insert(record) = plan_sync(&c, "2026-03", None) else {
            panic!("esperava Insert");
        };

        // Volta para pendente: remove o registro do mês (nenhum órfão)
        c.payment_status = PaymentStatus::Pending;
        assert!(matches!(
            plan_sync(&c, "2026-03", Some(&record)),
            CommissionSync::Remove
        ));

        // Sem registro e sem pagamento: nada a fazer
        assert!(matches!(plan_sync(&c, "2026-03", None), CommissionSync::Noop));
    }

    #[test]
    fn sync_is_noop_when_nothing_changed() {
        let c = client("Estável", 1000, 10, PaymentStatus::Paid);
        let record = commission_for_client(&c, "2026-03");
        assert!(matches!(
            plan_sync(&c, "2026-03", Some(&record)),
            CommissionSync::Noop
        ));
    }
}
