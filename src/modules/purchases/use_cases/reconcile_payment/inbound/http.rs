use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::purchases::adapters::outbound::payment_gateway::ClientConfirmation;
use crate::modules::purchases::use_cases::get_purchase_status::projection::PurchaseStatusView;
use crate::shell::auth::AuthenticatedUser;
use crate::shell::state::AppState;

#[derive(Serialize)]
pub struct WebhookReceipt {
    pub received: bool,
}

/// Takes the body as raw bytes: the signature covers them exactly.
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = headers
        .get(state.reconcile_handler.signature_header())
        .and_then(|value| value.to_str().ok());

    match state.reconcile_handler.handle(&body, signature).await {
        Ok(_) => Json(WebhookReceipt { received: true }).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Field names as Razorpay checkout hands them to the browser.
#[derive(Deserialize)]
pub struct ClientConfirmationBody {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

pub async fn confirm(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<ClientConfirmationBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let confirmation = ClientConfirmation {
        order_id: body.razorpay_order_id,
        payment_id: body.razorpay_payment_id,
        signature: body.razorpay_signature,
    };

    match state
        .reconcile_handler
        .confirm_client_payment(&user.user_id, confirmation)
        .await
    {
        Ok(ack) => match ack.record() {
            Some(record) => Json(PurchaseStatusView::from(record.clone())).into_response(),
            None => Json(WebhookReceipt { received: true }).into_response(),
        },
        Err(err) => err.into_response(),
    }
}
