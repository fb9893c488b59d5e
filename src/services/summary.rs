// src/services/summary.rs

use rust_decimal::Decimal;

use crate::models::financial::{
    AgencyExpense, Client, CommissionStatus, FinancialSummary, PaymentStatus,
    SellerCommissionRecord,
};

// Recorte do resumo: carteira inteira ou um mês específico ("YYYY-MM")
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryFilter {
    Total,
    Month(String),
}

/// Agrega receita, comissões e despesas em um resumo financeiro.
///
/// Determinística sobre coleções já carregadas; coleções vazias produzem
/// um resumo todo zerado.
///
/// No modo mensal a receita vem de `last_payment_month` e as comissões
/// contam pelo mês do registro, pago ou não — diferente do modo total,
/// que só soma comissões pagas. Comportamento herdado do sistema em
/// produção; ver DESIGN.md antes de mexer aqui.
pub fn summarize(
    clients: &[Client],
    agency_expenses: &[AgencyExpense],
    commissions: &[SellerCommissionRecord],
    filter: &SummaryFilter,
) -> FinancialSummary {
    let (total_revenue, total_extra_expenses, total_commissions) = match filter {
        SummaryFilter::Total => {
            let revenue: Decimal = clients
                .iter()
                .filter(|c| c.payment_status == PaymentStatus::Paid)
                .map(|c| c.monthly_value)
                .sum();

            // Despesas extras entram independente do status do cliente
            let extra: Decimal = clients
                .iter()
                .flat_map(|c| c.extra_expenses.iter())
                .map(|e| e.value)
                .sum();

            let commissions_paid: Decimal = commissions
                .iter()
                .filter(|r| r.payment_status == CommissionStatus::Paid)
                .map(|r| r.commission_value)
                .sum();

            (revenue, extra, commissions_paid)
        }
        SummaryFilter::Month(month) => {
            let in_month =
                |c: &&Client| c.last_payment_month.as_deref() == Some(month.as_str());

            let revenue: Decimal = clients
                .iter()
                .filter(in_month)
                .map(|c| c.monthly_value)
                .sum();

            let extra: Decimal = clients
                .iter()
                .filter(in_month)
                .flat_map(|c| c.extra_expenses.iter())
                .map(|e| e.value)
                .sum();

            let commissions_month: Decimal = commissions
                .iter()
                .filter(|r| r.month == *month)
                .map(|r| r.commission_value)
                .sum();

            (revenue, extra, commissions_month)
        }
    };

    // Despesas da agência não têm dimensão de mês: sempre entram inteiras
    let total_agency_expenses: Decimal = agency_expenses.iter().map(|e| e.value).sum();

    let total_expenses = total_commissions + total_extra_expenses + total_agency_expenses;
    let net_profit = total_revenue - total_expenses;

    FinancialSummary {
        total_revenue,
        total_expenses,
        total_commissions,
        total_extra_expenses,
        total_agency_expenses,
        net_profit,
    }
}

// Previsão do mês: quanto a carteira inteira renderia, quanto já entrou
// (clientes com o mês quitado) e quanto ainda falta receber.
#[derive(Debug, Clone, PartialEq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthForecast {
    pub total_expected: Decimal,
    pub paid_this_month: Decimal,
    pub to_receive: Decimal,
}

pub fn month_forecast(clients: &[Client], month: &str) -> MonthForecast {
    let total_expected: Decimal = clients.iter().map(|c| c.monthly_value).sum();

    let paid_this_month: Decimal = clients
        .iter()
        .filter(|c| c.last_payment_month.as_deref() == Some(month))
        .map(|c| c.monthly_value)
        .sum();

    MonthForecast {
        total_expected,
        paid_this_month,
        to_receive: total_expected - paid_this_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::financial::ExtraExpense;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn client(monthly_value: i64, status: PaymentStatus) -> Client {
        Client {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Cliente".to_string(),
            monthly_value: Decimal::from(monthly_value),
            payment_date: 5,
            payment_status: status,
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

    fn expense(value: i64) -> AgencyExpense {
        AgencyExpense {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            description: "Despesa".to_string(),
            value: Decimal::from(value),
            category: "Geral".to_string(),
            created_at: None,
        }
    }

    fn commission(value: i64, status: CommissionStatus, month: &str) -> SellerCommissionRecord {
        let client_id = Uuid::new_v4();
        SellerCommissionRecord {
            id: format!("{client_id}-{month}"),
            user_id: Uuid::new_v4(),
            client_id,
            client_name: "Cliente".to_string(),
            seller_name: "João".to_string(),
            commission_value: Decimal::from(value),
            payment_status: status,
            month: month.to_string(),
            paid_date: None,
            created_at: None,
        }
    }

    #[test]
    fn empty_collections_yield_zeroed_summary() {
        let summary = summarize(&[], &[], &[], &SummaryFilter::Total);
        assert_eq!(summary.total_revenue, Decimal::ZERO);
        assert_eq!(summary.total_expenses, Decimal::ZERO);
        assert_eq!(summary.net_profit, Decimal::ZERO);
    }

    #[test]
    fn only_paid_clients_count_as_revenue() {
        let clients = vec![
            client(500, PaymentStatus::Paid),
            client(300, PaymentStatus::Pending),
        ];
        let summary = summarize(&clients, &[], &[], &SummaryFilter::Total);
        assert_eq!(summary.total_revenue, Decimal::from(500));
        assert_eq!(summary.net_profit, Decimal::from(500));
    }

    #[test]
    fn extra_expenses_count_regardless_of_client_status() {
        let mut pending = client(300, PaymentStatus::Pending);
        pending.extra_expenses = Json(vec![ExtraExpense {
            id: Uuid::new_v4(),
            description: "Anúncios".to_string(),
            value: Decimal::from(50),
        }]);
        let clients = vec![client(1000, PaymentStatus::Paid), pending];

        let summary = summarize(&clients, &[], &[], &SummaryFilter::Total);
        assert_eq!(summary.total_extra_expenses, Decimal::from(50));
        assert_eq!(summary.total_revenue, Decimal::from(1000));
        assert_eq!(summary.net_profit, Decimal::from(950));
    }

    #[test]
    fn total_mode_counts_only_paid_commissions() {
        let commissions = vec![
            commission(100, CommissionStatus::Paid, "2026-03"),
            commission(70, CommissionStatus::Pending, "2026-03"),
        ];
        let summary = summarize(&[], &[], &commissions, &SummaryFilter::Total);
        assert_eq!(summary.total_commissions, Decimal::from(100));
    }

    // Assimetria herdada: no recorte mensal a comissão pendente também soma
    #[test]
    fn month_mode_counts_commissions_by_month_regardless_of_status() {
        let commissions = vec![
            commission(100, CommissionStatus::Paid, "2026-03"),
            commission(70, CommissionStatus::Pending, "2026-03"),
            commission(999, CommissionStatus::Paid, "2026-02"),
        ];
        let summary = summarize(
            &[],
            &[],
            &commissions,
            &SummaryFilter::Month("2026-03".to_string()),
        );
        assert_eq!(summary.total_commissions, Decimal::from(170));
    }

    #[test]
    fn month_mode_revenue_follows_last_payment_month() {
        let mut paid_march = client(800, PaymentStatus::Paid);
        paid_march.last_payment_month = Some("2026-03".to_string());
        let mut paid_feb = client(600, PaymentStatus::Paid);
        paid_feb.last_payment_month = Some("2026-02".to_string());
        let clients = vec![paid_march, paid_feb];

        let summary = summarize(
            &clients,
            &[],
            &[],
            &SummaryFilter::Month("2026-03".to_string()),
        );
        assert_eq!(summary.total_revenue, Decimal::from(800));
    }

    #[test]
    fn agency_expenses_are_never_month_filtered() {
        let expenses = vec![expense(120), expense(80)];
        let total = summarize(&[], &expenses, &[], &SummaryFilter::Total);
        let monthly = summarize(
            &[],
            &expenses,
            &[],
            &SummaryFilter::Month("2026-03".to_string()),
        );
        assert_eq!(total.total_agency_expenses, Decimal::from(200));
        assert_eq!(monthly.total_agency_expenses, Decimal::from(200));
    }

    #[test]
    fn expenses_formula_holds() {
        let mut c = client(2000, PaymentStatus::Paid);
        c.extra_expenses = Json(vec![ExtraExpense {
            id: Uuid::new_v4(),
            description: "Extra".to_string(),
            value: Decimal::from(30),
        }]);
        let clients = vec![c];
        let expenses = vec![expense(100)];
        let commissions = vec![commission(200, CommissionStatus::Paid, "2026-03")];

        let summary = summarize(&clients, &expenses, &commissions, &SummaryFilter::Total);
        assert_eq!(summary.total_expenses, Decimal::from(330));
        assert_eq!(summary.net_profit, Decimal::from(1670));
    }

    #[test]
    fn forecast_splits_received_from_outstanding() {
        let mut settled = client(800, PaymentStatus::Paid);
        settled.last_payment_month = Some("2026-03".to_string());
        let open = client(1200, PaymentStatus::Pending);

        let forecast = month_forecast(&[settled, open], "2026-03");
        assert_eq!(forecast.total_expected, Decimal::from(2000));
        assert_eq!(forecast.paid_this_month, Decimal::from(800));
        assert_eq!(forecast.to_receive, Decimal::from(1200));
    }

    // Propriedade de aditividade: resumo da união = soma dos resumos
    #[test]
    fn total_mode_is_additive_over_disjoint_client_sets() {
        let set_a = vec![client(500, PaymentStatus::Paid), client(200, PaymentStatus::Overdue)];
        let set_b = vec![client(900, PaymentStatus::Paid)];
        let union: Vec<Client> = set_a.iter().cloned().chain(set_b.iter().cloned()).collect();

        let a = summarize(&set_a, &[], &[], &SummaryFilter::Total);
        let b = summarize(&set_b, &[], &[], &SummaryFilter::Total);
        let u = summarize(&union, &[], &[], &SummaryFilter::Total);

        assert_eq!(u.total_revenue, a.total_revenue + b.total_revenue);
        assert_eq!(u.total_extra_expenses, a.total_extra_expenses + b.total_extra_expenses);
        assert_eq!(u.net_profit, a.net_profit + b.net_profit);
    }
}
