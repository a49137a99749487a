use crate::modules::purchases::adapters::outbound::payment_gateway::{
    CheckoutRequest, CheckoutSession, GatewayError, PaymentGateway,
};
use crate::modules::purchases::core::notification::{
    PURCHASE_ID_METADATA_KEY, PaymentNotification, PaymentOutcome,
};
use crate::modules::purchases::core::purchase::PaymentMethod;
use crate::shared::infrastructure::signature::verify_hmac_sha256_hex;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;

pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Clone)]
pub struct StripeSettings {
    pub secret_key: String,
    pub api_base: String,
    pub client_url: String,
    pub timeout_ms: u64,
    pub webhook_tolerance_seconds: i64,
}

#[derive(Clone)]
pub struct StripeGateway {
    http: reqwest::Client,
    settings: StripeSettings,
}

#[derive(Deserialize)]
struct StripeSessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Deserialize)]
struct StripeEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: StripeEventData,
}

#[derive(Deserialize)]
struct StripeEventData {
    object: serde_json::Value,
}

#[derive(Deserialize)]
struct StripeCheckoutSession {
    id: String,
    payment_status: Option<String>,
    amount_total: Option<i64>,
    client_reference_id: Option<String>,
    #[serde(default)]
    metadata: serde_json::Value,
}

impl StripeCheckoutSession {
    fn purchase_id(&self) -> Option<String> {
        self.client_reference_id
            .clone()
            .or_else(|| {
                self.metadata
                    .get(PURCHASE_ID_METADATA_KEY)
                    .and_then(|value| value.as_str())
                    .map(str::to_string)
            })
            .filter(|id| !id.is_empty())
    }
}

struct SignatureHeader<'a> {
    timestamp: &'a str,
    signatures: Vec<&'a str>,
}

fn parse_signature_header(header: &str) -> Option<SignatureHeader<'_>> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for item in header.split(',') {
        let (key, value) = item.trim().split_once('=')?;
        match key {
            "t" => timestamp = Some(value),
            "v1" => signatures.push(value),
            _ => {}
        }
    }
    if signatures.is_empty() {
        return None;
    }
    Some(SignatureHeader {
        timestamp: timestamp?,
        signatures,
    })
}

impl StripeGateway {
    pub fn new(settings: StripeSettings) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        Ok(Self { http, settings })
    }

    fn checkout_form(&self, request: &CheckoutRequest) -> Vec<(String, String)> {
        let client_url = self.settings.client_url.trim_end_matches('/');
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.to_ascii_lowercase(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.amount_minor.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.course_title.clone(),
            ),
            (
                "success_url".to_string(),
                format!(
                    "{client_url}/course-progress/{}?status=success",
                    request.course_id
                ),
            ),
            (
                "cancel_url".to_string(),
                format!(
                    "{client_url}/course-detail/{}?status=cancel",
                    request.course_id
                ),
            ),
            (
                "client_reference_id".to_string(),
                request.purchase_id.clone(),
            ),
        ];
        form.extend(
            request
                .metadata
                .iter()
                .map(|(key, value)| (format!("metadata[{key}]"), value.clone())),
        );
        form
    }
}

#[async_trait::async_trait]
impl PaymentGateway for StripeGateway {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Stripe
    }

    fn signature_header(&self) -> &'static str {
        STRIPE_SIGNATURE_HEADER
    }

    async fn create_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        let url = format!(
            "{}/v1/checkout/sessions",
            self.settings.api_base.trim_end_matches('/')
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.settings.secret_key)
            .header("Idempotency-Key", &request.purchase_id)
            .form(&self.checkout_form(&request))
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Unavailable(format!(
                "stripe responded {status}: {body}"
            )));
        }

        let session: StripeSessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        let redirect_url = session.url.ok_or_else(|| {
            GatewayError::Unavailable(format!("stripe session {} has no url", session.id))
        })?;
        Ok(CheckoutSession {
            session_id: session.id,
            redirect_url,
        })
    }

    /// `t=<unix>,v1=<hex>` where the signature covers `"{t}.{raw body}"`.
    fn verify_signature(&self, raw_payload: &[u8], signature_header: &str, secret: &str) -> bool {
        let Some(header) = parse_signature_header(signature_header) else {
            return false;
        };
        let Ok(signed_at) = header.timestamp.parse::<i64>() else {
            return false;
        };
        let tolerance = self.settings.webhook_tolerance_seconds.unsigned_abs();
        if Utc::now().timestamp().abs_diff(signed_at) > tolerance {
            return false;
        }
        header.signatures.iter().any(|signature| {
            verify_hmac_sha256_hex(
                signature,
                secret.as_bytes(),
                &[header.timestamp.as_bytes(), b".", raw_payload],
            )
        })
    }

    fn parse_notification(&self, raw_payload: &[u8]) -> Result<PaymentNotification, GatewayError> {
        let event: StripeEvent = serde_json::from_slice(raw_payload)
            .map_err(|e| GatewayError::MalformedNotification(e.to_string()))?;

        let session = || {
            serde_json::from_value::<StripeCheckoutSession>(event.data.object.clone())
                .map_err(|e| GatewayError::MalformedNotification(e.to_string()))
        };

        let (outcome, purchase_id) = match event.event_type.as_str() {
            "checkout.session.completed" => {
                let session = session()?;
                let purchase_id = session.purchase_id();
                let outcome = match session.payment_status.as_deref() {
                    Some("paid") | Some("no_payment_required") => PaymentOutcome::Succeeded {
                        external_payment_id: session.id,
                        amount_minor: session.amount_total,
                    },
                    // Delayed payment methods settle through the async_payment events.
                    _ => PaymentOutcome::Unrelated,
                };
                (outcome, purchase_id)
            }
            "checkout.session.async_payment_succeeded" => {
                let session = session()?;
                let purchase_id = session.purchase_id();
                let outcome = PaymentOutcome::Succeeded {
                    external_payment_id: session.id,
                    amount_minor: session.amount_total,
                };
                (outcome, purchase_id)
            }
            "checkout.session.async_payment_failed" | "checkout.session.expired" => {
                let session = session()?;
                let purchase_id = session.purchase_id();
                let outcome = PaymentOutcome::Failed {
                    external_payment_id: session.id,
                };
                (outcome, purchase_id)
            }
            _ => (PaymentOutcome::Unrelated, None),
        };

        Ok(PaymentNotification {
            event_id: event.id,
            event_type: event.event_type,
            outcome,
            purchase_id,
        })
    }
}
