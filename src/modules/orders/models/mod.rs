pub mod order;

pub use order::{Order, PaymentRecord, PaymentState};
