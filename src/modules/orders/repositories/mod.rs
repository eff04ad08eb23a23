pub mod in_memory;
pub mod order_gateway;

pub use in_memory::InMemoryOrderGateway;
pub use order_gateway::OrderGateway;
