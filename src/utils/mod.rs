pub mod clock;
pub mod expiry;

pub use clock::*;
pub use expiry::*;
