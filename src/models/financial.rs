// src/models/financial.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

// Status de pagamento definido manualmente pelo usuário no cadastro do
// cliente. Não confundir com o status DERIVADO da tela de cobranças
// (services::billing_status) — os dois coexistem e podem divergir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,    // Pago
    Pending, // Pendente
    Overdue, // Atrasado
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "commission_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Paid,
    Pending,
}

// --- Structs ---

// Despesa extra embutida no cliente (coluna JSONB, sem ciclo de vida próprio)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtraExpense {
    pub id: Uuid,

    #[schema(example = "Impulsionamento de anúncios")]
    pub description: String,

    #[schema(example = "150.00")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Padaria do Bairro")]
    pub name: String,

    #[schema(example = "1500.00")]
    pub monthly_value: Decimal,

    // Dia do mês em que a mensalidade vence (1 a 31)
    #[schema(example = 5)]
    pub payment_date: i32,

    pub payment_status: PaymentStatus,

    // Vazio = cliente sem vendedor
    #[schema(example = "João")]
    pub seller_name: String,

    // Percentual (0 a 100) sobre o valor mensal
    #[schema(example = "10.00")]
    pub seller_commission: Decimal,

    #[schema(value_type = Vec<ExtraExpense>)]
    pub extra_expenses: Json<Vec<ExtraExpense>>,

    #[schema(value_type = Option<String>, format = Date, example = "2026-01-15")]
    pub contract_start_date: Option<NaiveDate>,

    // Chaves "YYYY-MM": antes de first_payment_month o cliente não entra
    // nas cobranças; last_payment_month marca o mês mais recente quitado
    #[schema(example = "2026-02")]
    pub first_payment_month: Option<String>,
    #[schema(example = "2026-03")]
    pub last_payment_month: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Despesa fixa da agência (entidade independente, escopada por usuário)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyExpense {
    pub id: Uuid,

    #[schema(ignore)]
    pub user_id: Uuid,

    #[schema(example = "Assinatura de ferramenta de design")]
    pub description: String,

    #[schema(example = "89.90")]
    pub value: Decimal,

    #[schema(example = "Geral")]
    pub category: String,

    pub created_at: Option<DateTime<Utc>>,
}

// Comissão devida a um vendedor por um cliente em um mês.
// O id é derivado ("{client_id}-{month}"), então nunca existe mais de um
// registro para o mesmo par cliente/mês.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellerCommissionRecord {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000-2026-03")]
    pub id: String,

    #[schema(ignore)]
    pub user_id: Uuid,

    pub client_id: Uuid,

    // Snapshot no momento da geração (não é join ao vivo)
    pub client_name: String,
    pub seller_name: String,

    #[schema(example = "150.00")]
    pub commission_value: Decimal,

    pub payment_status: CommissionStatus,

    #[schema(example = "2026-03")]
    pub month: String,

    pub paid_date: Option<DateTime<Utc>>,

    pub created_at: Option<DateTime<Utc>>,
}

// Resumo financeiro derivado sob demanda — nunca persistido
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub total_commissions: Decimal,
    pub total_extra_expenses: Decimal,
    pub total_agency_expenses: Decimal,
    pub net_profit: Decimal,
}
