pub mod models;
pub mod repositories;

pub use models::{Order, PaymentRecord, PaymentState};
pub use repositories::{InMemoryOrderGateway, OrderGateway};
