use crate::shared::infrastructure::signature::hmac_sha256_hex;
use chrono::Utc;

pub const STRIPE_WEBHOOK_SECRET: &str = "whsec_test123secret456";

pub fn stripe_event(event_type: &str, session_id: &str, payment_status: &str, amount_total: i64) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": format!("evt_{session_id}"),
        "object": "event",
        "type": event_type,
        "data": {
            "object": {
                "id": session_id,
                "object": "checkout.session",
                "payment_status": payment_status,
                "amount_total": amount_total,
                "currency": "inr"
            }
        }
    }))
    .unwrap()
}

/// A checkout session event that echoes our purchase id back, as sessions
/// created by checkout do.
pub fn stripe_event_with_reference(
    event_type: &str,
    session_id: &str,
    payment_status: &str,
    amount_total: i64,
    purchase_id: &str,
) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": format!("evt_{session_id}"),
        "object": "event",
        "type": event_type,
        "data": {
            "object": {
                "id": session_id,
                "object": "checkout.session",
                "payment_status": payment_status,
                "amount_total": amount_total,
                "currency": "inr",
                "client_reference_id": purchase_id,
                "metadata": { "purchaseId": purchase_id }
            }
        }
    }))
    .unwrap()
}

pub fn stripe_signature_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let timestamp = timestamp.to_string();
    let signature = hmac_sha256_hex(secret.as_bytes(), &[timestamp.as_bytes(), b".", payload]);
    format!("t={timestamp},v1={signature}")
}

pub fn sign_stripe_now(payload: &[u8]) -> String {
    stripe_signature_header(payload, STRIPE_WEBHOOK_SECRET, Utc::now().timestamp())
}

pub fn razorpay_order_paid(order_id: &str, amount_paid: i64) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "entity": "event",
        "event": "order.paid",
        "payload": {
            "payment": { "entity": { "id": format!("pay_{order_id}"), "order_id": order_id, "amount": amount_paid } },
            "order": { "entity": { "id": order_id, "amount_paid": amount_paid, "status": "paid" } }
        }
    }))
    .unwrap()
}

pub fn razorpay_payment_event(event: &str, order_id: &str, amount: i64) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "entity": "event",
        "event": event,
        "payload": {
            "payment": { "entity": { "id": format!("pay_{order_id}"), "order_id": order_id, "amount": amount } }
        }
    }))
    .unwrap()
}

pub fn razorpay_order_paid_with_notes(order_id: &str, amount_paid: i64, purchase_id: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "entity": "event",
        "event": "order.paid",
        "payload": {
            "payment": { "entity": { "id": format!("pay_{order_id}"), "order_id": order_id, "amount": amount_paid, "notes": [] } },
            "order": { "entity": { "id": order_id, "amount_paid": amount_paid, "status": "paid", "notes": { "purchaseId": purchase_id } } }
        }
    }))
    .unwrap()
}

pub const RAZORPAY_KEY_SECRET: &str = "rzp_test_secret";
pub const RAZORPAY_WEBHOOK_SECRET: &str = "rzp_test_webhook_secret";

/// The `razorpay_signature` checkout hands the browser after payment.
pub fn sign_razorpay_confirmation(order_id: &str, payment_id: &str) -> String {
    hmac_sha256_hex(
        RAZORPAY_KEY_SECRET.as_bytes(),
        &[order_id.as_bytes(), b"|", payment_id.as_bytes()],
    )
}
