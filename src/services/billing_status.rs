// src/services/billing_status.rs

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::month::month_key,
    models::financial::{Client, PaymentStatus},
};

/// Status de cobrança derivado da data — projeção pura, recalculada a cada
/// listagem. Não altera o `payment_status` manual do cadastro: os dois
/// conceitos coexistem e podem divergir.
///
/// `None` = cliente ainda não entrou no primeiro mês de cobrança.
pub fn derive_status(client: &Client, today: NaiveDate) -> Option<PaymentStatus> {
    let current_month = month_key(today);

    // Antes do primeiro mês de pagamento o cliente não é cobrado.
    // Chaves "YYYY-MM" zero-padded ordenam como o calendário.
    if let Some(first_month) = &client.first_payment_month {
        if current_month < *first_month {
            return None;
        }
    }

    // Já quitou este mês
    if client.last_payment_month.as_deref() == Some(current_month.as_str()) {
        return Some(PaymentStatus::Paid);
    }

    // Passou do dia de vencimento
    if today.day() as i32 > client.payment_date {
        return Some(PaymentStatus::Overdue);
    }

    Some(PaymentStatus::Pending)
}

// Cliente anotado com o status derivado, para a tela de cobranças
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeEntry {
    #[serde(flatten)]
    pub client: Client,
    pub status: PaymentStatus,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChargeCounts {
    pub all: usize,
    pub pending: usize,
    pub overdue: usize,
    pub paid: usize,
}

/// Monta a lista de cobranças: descarta clientes ainda não cobráveis,
/// ordena atrasados primeiro e depois por dia de vencimento.
pub fn build_charges(clients: Vec<Client>, today: NaiveDate) -> (Vec<ChargeEntry>, ChargeCounts) {
    let mut entries: Vec<ChargeEntry> = clients
        .into_iter()
        .filter_map(|client| {
            derive_status(&client, today).map(|status| ChargeEntry { client, status })
        })
        .collect();

    entries.sort_by(|a, b| {
        let overdue_first = |e: &ChargeEntry| e.status != PaymentStatus::Overdue;
        overdue_first(a)
            .cmp(&overdue_first(b))
            .then(a.client.payment_date.cmp(&b.client.payment_date))
    });

    let mut counts = ChargeCounts { all: entries.len(), ..Default::default() };
    for entry in &entries {
        match entry.status {
            PaymentStatus::Pending => counts.pending += 1,
            PaymentStatus::Overdue => counts.overdue += 1,
            PaymentStatus::Paid => counts.paid += 1,
        }
    }

    (entries, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn client(payment_date: i32) -> Client {
        Client {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Cliente".to_string(),
            monthly_value: Decimal::from(1000),
            payment_date,
            payment_status: PaymentStatus::Pending,
            seller_name: String::new(),
            seller_commission: Decimal::ZERO,
            extra_expenses: Json(vec![]),
            contract_start_date: None,
            first_payment_month: None,
            last_payment_month: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn overdue_after_due_day() {
        let c = client(5);
        assert_eq!(derive_status(&c, day(2026, 3, 10)), Some(PaymentStatus::Overdue));
    }

    #[test]
    fn pending_on_or_before_due_day() {
        let c = client(5);
        assert_eq!(derive_status(&c, day(2026, 3, 5)), Some(PaymentStatus::Pending));
        assert_eq!(derive_status(&c, day(2026, 3, 1)), Some(PaymentStatus::Pending));
    }

    #[test]
    fn paid_when_current_month_was_settled() {
        let mut c = client(5);
        c.last_payment_month = Some("2026-03".to_string());
        // Mesmo depois do vencimento, o mês quitado prevalece
        assert_eq!(derive_status(&c, day(2026, 3, 20)), Some(PaymentStatus::Paid));
    }

    #[test]
    fn settlement_of_past_month_does_not_carry_over() {
        let mut c = client(5);
        c.last_payment_month = Some("2026-02".to_string());
        assert_eq!(derive_status(&c, day(2026, 3, 10)), Some(PaymentStatus::Overdue));
    }

    #[test]
    fn not_billable_before_first_payment_month() {
        let mut c = client(5);
        c.first_payment_month = Some("2026-01".to_string());
        assert_eq!(derive_status(&c, day(2025, 12, 15)), None);
        // A partir do mês de início, cobra normalmente
        assert_eq!(derive_status(&c, day(2026, 1, 2)), Some(PaymentStatus::Pending));
    }

    #[test]
    fn charges_sort_overdue_first_then_by_due_day() {
        let mut paid = client(1);
        paid.last_payment_month = Some("2026-03".to_string());
        let mut not_yet = client(8);
        not_yet.first_payment_month = Some("2027-01".to_string());

        let clients = vec![client(20), client(3), paid, not_yet];
        let (entries, counts) = build_charges(clients, day(2026, 3, 10));

        // O cliente ainda não cobrável fica de fora
        assert_eq!(counts.all, 3);
        assert_eq!(counts.overdue, 1);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.paid, 1);

        assert_eq!(entries[0].status, PaymentStatus::Overdue);
        assert_eq!(entries[0].client.payment_date, 3);
    }
}
