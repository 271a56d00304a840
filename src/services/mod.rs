pub mod checkout_service;
pub mod payment_gateway;
pub mod token_service;

pub use payment_gateway::{PaymentGateway, StripeGateway};
pub use token_service::TokenKeys;
