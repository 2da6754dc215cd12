pub mod bank_account;
pub mod common;
pub mod dashboard;
pub mod spending;
pub mod subscription;

pub use bank_account::*;
pub use common::*;
pub use dashboard::*;
pub use spending::*;
pub use subscription::*;
