use axum::{Json, extract::State, response::IntoResponse};

use crate::shell::auth::AuthenticatedUser;
use crate::shell::state::AppState;

pub async fn handle(State(state): State<AppState>, user: AuthenticatedUser) -> impl IntoResponse {
    match state.purchased_courses_handler.handle(&user.user_id).await {
        Ok(views) => Json(views).into_response(),
        Err(err) => err.into_response(),
    }
}
