use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::shell::auth::AuthenticatedUser;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    match state.status_handler.handle(&user.user_id, &course_id).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => err.into_response(),
    }
}
