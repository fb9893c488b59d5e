pub mod user_repo;
pub use user_repo::UserRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod expense_repo;
pub use expense_repo::ExpenseRepository;
pub mod commission_repo;
pub use commission_repo::CommissionRepository;
pub mod subscription_repo;
pub use subscription_repo::SubscriptionRepository;
