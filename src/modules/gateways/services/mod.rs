pub mod callback_verifier;
pub mod request_signer;
pub mod signing;

pub use callback_verifier::{
    ApprovalRule, CallbackDecision, CallbackParams, CallbackVerifier, DecisionBasis,
    APPROVED_RESPONSE_CODE,
};
pub use request_signer::{
    Language, PaymentRequest, RequestSigner, SignedRequest, SmartBoxPayload,
    DEFAULT_REQUEST_SOURCE,
};
pub use signing::{
    SecureHash, SignedString, SigningContext, CALLBACK_SIGNING_FIELDS, REQUEST_SIGNING_FIELDS,
};
