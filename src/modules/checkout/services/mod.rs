pub mod checkout_service;

pub use checkout_service::{
    CallbackOutcome, CheckoutRedirect, CheckoutService, SmartBoxRequest,
    PAYMENT_APPROVED_MESSAGE, PAYMENT_NOT_COMPLETED_MESSAGE,
};
