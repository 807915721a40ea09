use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::api::ErrorResponse;
use crate::auth::{delete_session, BearerToken};
use crate::db::get_conn;
use crate::error::ApiError;
use crate::SharedState;

#[utoipa::path(
    post,
    path = "/api/auth/token/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout(
    State(state): State<SharedState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let deleted = delete_session(&mut conn, &token)?;
    if deleted == 0 {
        return Err(ApiError::Unauthorized("Invalid or expired token"));
    }

    Ok(StatusCode::NO_CONTENT)
}
