use crate::modules::purchases::adapters::outbound::payment_gateway::{
    CheckoutRequest, CheckoutSession, GatewayError, PaymentGateway,
};
use crate::modules::purchases::adapters::outbound::razorpay_gateway::{
    RazorpayGateway, RazorpaySettings,
};
use crate::modules::purchases::adapters::outbound::stripe_gateway::{StripeGateway, StripeSettings};
use crate::tests::fixtures::signatures::RAZORPAY_KEY_SECRET;
use crate::modules::purchases::core::notification::PaymentNotification;
use crate::modules::purchases::core::purchase::PaymentMethod;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Hands out `cs_test_<n>` sessions without network calls, and verifies and
/// parses webhooks exactly like the Stripe adapter.
pub struct StubGateway {
    stripe: StripeGateway,
    counter: AtomicUsize,
    is_offline: AtomicBool,
    pub requests: Mutex<Vec<CheckoutRequest>>,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl StubGateway {
    pub fn new() -> Self {
        let stripe = StripeGateway::new(StripeSettings {
            secret_key: "sk_test_xxx".into(),
            api_base: "http://127.0.0.1:9".into(),
            client_url: "http://localhost:5173".into(),
            timeout_ms: 1_000,
            webhook_tolerance_seconds: 300,
        })
        .unwrap();
        Self {
            stripe,
            counter: AtomicUsize::new(0),
            is_offline: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn last_request(&self) -> Option<CheckoutRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl PaymentGateway for StubGateway {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Stripe
    }

    fn signature_header(&self) -> &'static str {
        self.stripe.signature_header()
    }

    async fn create_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, GatewayError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("Payment gateway offline".into()));
        }
        self.requests.lock().unwrap().push(request);
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let session_id = format!("cs_test_{n}");
        Ok(CheckoutSession {
            redirect_url: format!("https://checkout.stripe.com/c/pay/{session_id}"),
            session_id,
        })
    }

    fn verify_signature(&self, raw_payload: &[u8], signature_header: &str, secret: &str) -> bool {
        self.stripe
            .verify_signature(raw_payload, signature_header, secret)
    }

    fn parse_notification(&self, raw_payload: &[u8]) -> Result<PaymentNotification, GatewayError> {
        self.stripe.parse_notification(raw_payload)
    }
}

/// A real Razorpay adapter pointed at a closed port; only the offline paths
/// (signatures, parsing, client confirmations) are usable.
pub fn razorpay_gateway() -> RazorpayGateway {
    RazorpayGateway::new(RazorpaySettings {
        key_id: "rzp_test_key".into(),
        key_secret: RAZORPAY_KEY_SECRET.into(),
        api_base: "http://127.0.0.1:9".into(),
        client_url: "http://localhost:5173".into(),
        timeout_ms: 1_000,
    })
    .unwrap()
}
