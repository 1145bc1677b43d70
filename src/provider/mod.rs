pub mod client;
pub mod signature;

pub use client::{
    Channel, Network, PaymentRequest, ProviderError, Rate, RequestDestination, RequestSender,
    YellowCardClient,
};
pub use signature::WebhookVerifier;
