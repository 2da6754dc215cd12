pub mod admin;
pub mod bank_account;
pub mod dashboard;
pub mod spending;
pub mod subscription;

pub use admin::admin_config;
pub use bank_account::bank_account_config;
pub use dashboard::dashboard_config;
pub use spending::spending_config;
pub use subscription::subscription_config;
