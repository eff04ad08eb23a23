pub mod gateway_config;

pub use gateway_config::{GatewayEnvironment, MerchantCredentials, SecretKey};
