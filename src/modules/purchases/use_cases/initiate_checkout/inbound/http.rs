use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::purchases::errors::PurchaseError;
use crate::modules::purchases::use_cases::initiate_checkout::command::InitiateCheckout;
use crate::shell::auth::AuthenticatedUser;
use crate::shell::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub course_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub purchase_id: String,
}

pub async fn handle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<CheckoutBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let course_id = body.course_id.trim();
    if course_id.is_empty() {
        return PurchaseError::InvalidReference("course id is blank".into()).into_response();
    }

    let command = InitiateCheckout {
        purchase_id: Uuid::now_v7().to_string(),
        user_id: user.user_id,
        course_id: course_id.to_string(),
        requested_at: Utc::now().timestamp_millis(),
    };

    match state.checkout_handler.handle(command).await {
        Ok(started) => Json(CheckoutResponse {
            checkout_url: started.checkout_url,
            purchase_id: started.purchase_id,
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}
