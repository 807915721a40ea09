use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::ErrorResponse;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::db::get_conn;
use crate::error::ApiError;
use crate::schema::users;
use crate::SharedState;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/users/set_password",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "New password rejected by policy", body = ErrorResponse),
        (status = 401, description = "Current password does not match", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_password(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<SetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Current password does not match"));
    }

    state
        .config
        .password_policy
        .check(&req.new_password, &user.username, &user.email)
        .map_err(ApiError::Validation)?;

    let password_hash = hash_password(&req.new_password)
        .map_err(|_| ApiError::BadRequest("Failed to hash password".to_string()))?;

    let mut conn = get_conn(&state.pool)?;

    diesel::update(users::table.find(user.id))
        .set((
            users::password_hash.eq(&password_hash),
            users::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}
