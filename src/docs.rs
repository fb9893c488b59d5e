// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_access,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::mark_client_paid,
        handlers::clients::delete_client,

        // --- Expenses ---
        handlers::expenses::list_expenses,
        handlers::expenses::create_expense,
        handlers::expenses::update_expense,
        handlers::expenses::delete_expense,

        // --- Commissions ---
        handlers::commissions::list_commissions,
        handlers::commissions::generate_commissions,
        handlers::commissions::set_commission_status,

        // --- Payments ---
        handlers::payments::list_charges,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_forecast,
        handlers::dashboard::get_status_breakdown,

        // --- Billing ---
        handlers::billing::list_plans,
        handlers::billing::create_checkout,
        handlers::billing::create_portal,
        handlers::billing::sync_subscription,
        handlers::billing::stripe_webhook,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            handlers::auth::AccessResponse,

            // --- Financial ---
            models::financial::PaymentStatus,
            models::financial::CommissionStatus,
            models::financial::ExtraExpense,
            models::financial::Client,
            models::financial::AgencyExpense,
            models::financial::SellerCommissionRecord,
            models::financial::FinancialSummary,

            // --- Subscription ---
            models::subscription::PlanId,
            models::subscription::SubscriptionStatus,
            models::subscription::Subscription,
            models::subscription::TrialInfo,
            models::subscription::Plan,

            // --- Payloads ---
            handlers::clients::ClientPayload,
            handlers::clients::ExtraExpensePayload,
            handlers::expenses::ExpensePayload,
            handlers::commissions::GenerateCommissionsPayload,
            handlers::commissions::CommissionStatusPayload,
            handlers::billing::CreateCheckoutPayload,
            handlers::billing::CheckoutResponse,
            handlers::billing::CreatePortalPayload,
            handlers::billing::PortalResponse,
            handlers::billing::SyncSubscriptionPayload,

            // --- Derived views ---
            services::billing_status::ChargeEntry,
            services::billing_status::ChargeCounts,
            services::summary::MonthForecast,
            handlers::payments::ChargesResponse,
            handlers::dashboard::StatusBreakdown,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Estado de Acesso"),
        (name = "Clients", description = "Carteira de Clientes"),
        (name = "Expenses", description = "Despesas da Agência"),
        (name = "Commissions", description = "Comissões de Vendedores"),
        (name = "Payments", description = "Cobranças do Mês"),
        (name = "Dashboard", description = "Resumo e Indicadores Financeiros"),
        (name = "Billing", description = "Planos, Checkout e Webhook do Stripe")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
