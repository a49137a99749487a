use crate::modules::purchases::core::notification::PaymentNotification;
use crate::modules::purchases::core::purchase::PaymentMethod;
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),

    #[error("malformed notification: {0}")]
    MalformedNotification(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Sent as the provider idempotency key so a retried call reuses the session.
    pub purchase_id: String,
    pub course_id: String,
    pub course_title: String,
    pub amount_minor: i64,
    pub currency: String,
    /// Opaque to the provider, echoed back on the session or order.
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub session_id: String,
    pub redirect_url: String,
}

/// Proof of payment the provider's checkout widget hands to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn method(&self) -> PaymentMethod;

    /// Lowercase name of the header carrying the webhook signature.
    fn signature_header(&self) -> &'static str;

    async fn create_session(&self, request: CheckoutRequest)
    -> Result<CheckoutSession, GatewayError>;

    fn verify_signature(&self, raw_payload: &[u8], signature_header: &str, secret: &str) -> bool;

    /// Only called on payloads that passed `verify_signature`.
    fn parse_notification(&self, raw_payload: &[u8]) -> Result<PaymentNotification, GatewayError>;

    /// `None` when the provider settles only through webhooks.
    fn verify_client_confirmation(&self, _confirmation: &ClientConfirmation) -> Option<bool> {
        None
    }
}
