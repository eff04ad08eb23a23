pub mod models;
pub mod services;

pub use models::{GatewayEnvironment, MerchantCredentials, SecretKey};
pub use services::{
    ApprovalRule, CallbackDecision, CallbackParams, CallbackVerifier, DecisionBasis, Language,
    PaymentRequest, RequestSigner, SecureHash, SignedRequest, SmartBoxPayload,
};

/// Label the host assigns to orders paid through this gateway
pub const GATEWAY_LABEL: &str = "amwalpay";
