//! AmwalPay hosted checkout integration
//!
//! Signs SmartBox payment requests and verifies the gateway's callback hash
//! before an order is marked paid.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::checkout;
pub use modules::gateways;
pub use modules::orders;
