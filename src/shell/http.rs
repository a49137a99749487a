use axum::{
    Extension, Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::modules::purchases::errors::PurchaseError;
use crate::modules::purchases::use_cases::get_purchase_status::inbound::http as status_http;
use crate::modules::purchases::use_cases::initiate_checkout::inbound::http as checkout_http;
use crate::modules::purchases::use_cases::list_purchased_courses::inbound::http as purchased_http;
use crate::modules::purchases::use_cases::reconcile_payment::inbound::http as webhook_http;
use crate::modules::purchases::use_cases::refund_purchase::inbound::http as refund_http;
use crate::shell::graphql::{build_schema, graphiql, graphql};
use crate::shell::state::AppState;

pub fn status_for(err: &PurchaseError) -> StatusCode {
    match err {
        PurchaseError::NotFound(_) => StatusCode::NOT_FOUND,
        PurchaseError::InvalidReference(_) | PurchaseError::InvalidRefund(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PurchaseError::AlreadyPurchased { .. } | PurchaseError::InvalidTransition(_) => {
            StatusCode::CONFLICT
        }
        PurchaseError::GatewayUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        PurchaseError::AuthenticityFailure | PurchaseError::MalformedNotification(_) => {
            StatusCode::BAD_REQUEST
        }
        PurchaseError::Forbidden(_) => StatusCode::FORBIDDEN,
        PurchaseError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
        PurchaseError::Ledger(_) | PurchaseError::Catalog(_) | PurchaseError::Identity(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for PurchaseError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

pub fn router(state: AppState) -> Router {
    let schema = build_schema(state.clone());
    Router::new()
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema))
        .route("/health", get(health))
        .route("/purchase", get(purchased_http::handle))
        .route("/purchase/checkout", post(checkout_http::handle))
        .route("/purchase/webhook", post(webhook_http::handle))
        .route("/purchase/razorpay/verify", post(webhook_http::confirm))
        .route("/purchase/status/{course_id}", get(status_http::handle))
        .route("/purchase/{purchase_id}/refund", post(refund_http::handle))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
