pub mod bank_accounts;
pub mod spendings;
pub mod subscription_alerts;
pub mod subscriptions;

pub use bank_accounts::BankAccountType;
pub use spendings::PaymentMethod;
pub use subscriptions::SubscriptionType;

pub use bank_accounts as bank_account_entity;
pub use spendings as spending_entity;
pub use subscription_alerts as subscription_alert_entity;
pub use subscriptions as subscription_entity;
