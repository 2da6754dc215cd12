pub mod alert_ledger_service;
pub mod alert_service;
pub mod bank_account_service;
pub mod dashboard_service;
pub mod maintenance_service;
pub mod spending_service;
pub mod subscription_service;
pub mod validation;

pub use alert_ledger_service::*;
pub use alert_service::*;
pub use bank_account_service::*;
pub use dashboard_service::*;
pub use maintenance_service::*;
pub use spending_service::*;
pub use subscription_service::*;
