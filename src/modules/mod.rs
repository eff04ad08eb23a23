pub mod checkout;
pub mod gateways;
pub mod orders;
