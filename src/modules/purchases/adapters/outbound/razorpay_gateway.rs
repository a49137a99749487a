use crate::modules::purchases::adapters::outbound::payment_gateway::{
    CheckoutRequest, CheckoutSession, ClientConfirmation, GatewayError, PaymentGateway,
};
use crate::modules::purchases::core::notification::{
    PURCHASE_ID_METADATA_KEY, PaymentNotification, PaymentOutcome,
};
use crate::modules::purchases::core::purchase::PaymentMethod;
use crate::shared::infrastructure::signature::verify_hmac_sha256_hex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const RAZORPAY_SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Razorpay caps order receipts at 40 characters.
const RECEIPT_MAX_LEN: usize = 40;

#[derive(Debug, Clone)]
pub struct RazorpaySettings {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
    pub client_url: String,
    pub timeout_ms: u64,
}

#[derive(Clone)]
pub struct RazorpayGateway {
    http: reqwest::Client,
    settings: RazorpaySettings,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: String,
    notes: &'a BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
}

#[derive(Deserialize)]
struct RazorpayEvent {
    event: String,
    #[serde(default)]
    payload: RazorpayPayload,
}

#[derive(Deserialize, Default)]
struct RazorpayPayload {
    payment: Option<Wrapped<RazorpayPayment>>,
    order: Option<Wrapped<RazorpayOrder>>,
}

#[derive(Deserialize)]
struct Wrapped<T> {
    entity: T,
}

#[derive(Deserialize)]
struct RazorpayPayment {
    id: String,
    order_id: Option<String>,
    amount: Option<i64>,
    #[serde(default)]
    notes: serde_json::Value,
}

#[derive(Deserialize)]
struct RazorpayOrder {
    id: String,
    amount_paid: Option<i64>,
    #[serde(default)]
    notes: serde_json::Value,
}

// Razorpay sends empty notes as `[]`, so they stay untyped.
fn purchase_id_in(notes: &serde_json::Value) -> Option<String> {
    notes
        .get(PURCHASE_ID_METADATA_KEY)
        .and_then(|value| value.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn receipt_for(purchase_id: &str) -> String {
    let mut receipt = format!("rcpt_{}", purchase_id.replace('-', ""));
    receipt.truncate(RECEIPT_MAX_LEN);
    receipt
}

fn malformed(message: &str) -> GatewayError {
    GatewayError::MalformedNotification(message.to_string())
}

impl RazorpayGateway {
    pub fn new(settings: RazorpaySettings) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        Ok(Self { http, settings })
    }
}

#[async_trait::async_trait]
impl PaymentGateway for RazorpayGateway {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Razorpay
    }

    fn signature_header(&self) -> &'static str {
        RAZORPAY_SIGNATURE_HEADER
    }

    async fn create_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let url = format!("{}/v1/orders", self.settings.api_base.trim_end_matches('/'));
        let body = CreateOrderBody {
            amount: request.amount_minor,
            currency: &request.currency,
            receipt: receipt_for(&request.purchase_id),
            notes: &request.metadata,
        };
        let response = self
            .http
            .post(url)
            .basic_auth(&self.settings.key_id, Some(&self.settings.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Unavailable(format!(
                "razorpay responded {status}: {body}"
            )));
        }

        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        // The client opens the Razorpay widget for this order on its checkout page.
        let redirect_url = format!(
            "{}/course-checkout/{}?orderId={}",
            self.settings.client_url.trim_end_matches('/'),
            request.course_id,
            order.id
        );
        Ok(CheckoutSession {
            session_id: order.id,
            redirect_url,
        })
    }

    /// Hex HMAC-SHA256 of the raw body keyed with the webhook secret.
    fn verify_signature(&self, raw_payload: &[u8], signature_header: &str, secret: &str) -> bool {
        !signature_header.trim().is_empty()
            && verify_hmac_sha256_hex(signature_header, secret.as_bytes(), &[raw_payload])
    }

    fn parse_notification(&self, raw_payload: &[u8]) -> Result<PaymentNotification, GatewayError> {
        let event: RazorpayEvent = serde_json::from_slice(raw_payload)
            .map_err(|e| GatewayError::MalformedNotification(e.to_string()))?;
        let payload = event.payload;

        let (event_id, outcome, purchase_id) = match event.event.as_str() {
            "order.paid" => {
                let order = payload
                    .order
                    .ok_or_else(|| malformed("order.paid without order entity"))?
                    .entity;
                let payment = payload.payment.map(|payment| payment.entity);
                let purchase_id = purchase_id_in(&order.notes).or_else(|| {
                    payment
                        .as_ref()
                        .and_then(|payment| purchase_id_in(&payment.notes))
                });
                (
                    payment
                        .map(|payment| payment.id)
                        .unwrap_or_else(|| order.id.clone()),
                    PaymentOutcome::Succeeded {
                        external_payment_id: order.id,
                        amount_minor: order.amount_paid,
                    },
                    purchase_id,
                )
            }
            "payment.captured" | "payment.failed" => {
                let payment = payload
                    .payment
                    .ok_or_else(|| malformed("payment event without payment entity"))?
                    .entity;
                let order_id = payment
                    .order_id
                    .ok_or_else(|| malformed("payment event without order id"))?;
                let purchase_id = purchase_id_in(&payment.notes);
                let outcome = if event.event == "payment.captured" {
                    PaymentOutcome::Succeeded {
                        external_payment_id: order_id,
                        amount_minor: payment.amount,
                    }
                } else {
                    PaymentOutcome::Failed {
                        external_payment_id: order_id,
                    }
                };
                (payment.id, outcome, purchase_id)
            }
            _ => (String::new(), PaymentOutcome::Unrelated, None),
        };

        Ok(PaymentNotification {
            event_id,
            event_type: event.event,
            outcome,
            purchase_id,
        })
    }

    /// Hex HMAC-SHA256 of `"{order_id}|{payment_id}"` keyed with the API key secret.
    fn verify_client_confirmation(&self, confirmation: &ClientConfirmation) -> Option<bool> {
        Some(
            !confirmation.signature.trim().is_empty()
                && verify_hmac_sha256_hex(
                    &confirmation.signature,
                    self.settings.key_secret.as_bytes(),
                    &[
                        confirmation.order_id.as_bytes(),
                        b"|",
                        confirmation.payment_id.as_bytes(),
                    ],
                ),
        )
    }
}
