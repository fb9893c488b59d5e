pub mod auth;
pub use auth::AuthService;
pub mod access;
pub mod summary;
pub mod commission;
pub use commission::CommissionService;
pub mod billing_status;
pub mod client_service;
pub use client_service::ClientService;
pub mod stripe;
pub use stripe::StripeClient;
pub mod billing;
pub use billing::BillingService;
