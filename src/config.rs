// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        ClientRepository, CommissionRepository, ExpenseRepository, SubscriptionRepository,
        UserRepository,
    },
    services::{
        AuthService, BillingService, ClientService, CommissionService, StripeClient,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub commission_service: CommissionService,
    pub billing_service: BillingService,
    pub expense_repo: ExpenseRepository,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o grafo de serviços
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let stripe_secret_key =
            env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY deve ser definida");
        let stripe_webhook_secret =
            env::var("STRIPE_WEBHOOK_SECRET").expect("STRIPE_WEBHOOK_SECRET deve ser definido");
        // Origem do app web (URLs de retorno do checkout/portal)
        let app_base_url =
            env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:8081".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let expense_repo = ExpenseRepository::new(db_pool.clone());
        let commission_repo = CommissionRepository::new(db_pool.clone());
        let subscription_repo = SubscriptionRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret.clone(), db_pool.clone());
        let client_service = ClientService::new(
            client_repo.clone(),
            commission_repo.clone(),
            db_pool.clone(),
        );
        let commission_service =
            CommissionService::new(client_repo, commission_repo, db_pool.clone());

        let stripe = StripeClient::new(stripe_secret_key, stripe_webhook_secret);
        let billing_service =
            BillingService::new(stripe, subscription_repo, db_pool.clone(), app_base_url);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            client_service,
            commission_service,
            billing_service,
            expense_repo,
        })
    }
}
