//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::access::access_guard;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/access", get(handlers::auth::get_access))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas financeiras: além do token, as mutações passam pelo porteiro
    // do trial (teste expirado = modo somente leitura).
    // Camadas de fora para dentro: auth_guard -> access_guard -> handler.
    let client_routes = Router::new()
        .route("/"
               ,post(handlers::clients::create_client)
               .get(handlers::clients::list_clients)
        )
        .route("/{id}"
               ,axum::routing::put(handlers::clients::update_client)
               .delete(handlers::clients::delete_client)
        )
        .route("/{id}/mark-paid"
               ,post(handlers::clients::mark_client_paid)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            access_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let expense_routes = Router::new()
        .route("/"
               ,post(handlers::expenses::create_expense)
               .get(handlers::expenses::list_expenses)
        )
        .route("/{id}"
               ,axum::routing::put(handlers::expenses::update_expense)
               .delete(handlers::expenses::delete_expense)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            access_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let commission_routes = Router::new()
        .route("/", get(handlers::commissions::list_commissions))
        .route("/generate", post(handlers::commissions::generate_commissions))
        .route("/{id}/status", patch(handlers::commissions::set_commission_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            access_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Leituras derivadas (cobranças e dashboard): só autenticação
    let payment_routes = Router::new()
        .route("/", get(handlers::payments::list_charges))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/forecast", get(handlers::dashboard::get_forecast))
        .route("/status-breakdown", get(handlers::dashboard::get_status_breakdown))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Billing: o webhook fica fora do guard (o Stripe não manda JWT;
    // a autenticidade vem da assinatura do corpo)
    let billing_protected = Router::new()
        .route("/checkout", post(handlers::billing::create_checkout))
        .route("/portal", post(handlers::billing::create_portal))
        .route("/sync", post(handlers::billing::sync_subscription))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let billing_routes = Router::new()
        .route("/webhook", post(handlers::billing::stripe_webhook))
        .merge(billing_protected);

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/plans", get(handlers::billing::list_plans))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/expenses", expense_routes)
        .nest("/api/commissions", commission_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/billing", billing_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
