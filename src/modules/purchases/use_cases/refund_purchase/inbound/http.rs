use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::modules::purchases::use_cases::get_purchase_status::projection::PurchaseStatusView;
use crate::modules::purchases::use_cases::refund_purchase::command::RefundPurchase;
use crate::shell::auth::AuthenticatedUser;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct RefundBody {
    pub amount: Option<Decimal>,
    pub reason: String,
}

pub async fn handle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(purchase_id): Path<String>,
    body: Result<Json<RefundBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    let command = RefundPurchase {
        purchase_id,
        actor_id: user.user_id,
        amount: body.amount,
        reason: body.reason,
        requested_at: Utc::now().timestamp_millis(),
    };

    match state.refund_handler.handle(command).await {
        Ok(record) => Json(PurchaseStatusView::from(record)).into_response(),
        Err(err) => err.into_response(),
    }
}
