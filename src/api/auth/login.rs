use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::ErrorResponse;
use crate::auth::{create_session, verify_password};
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use crate::SharedState;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub auth_token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/token/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "password"})),
    responses(
        (status = 201, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let user: Option<User> = users::table
        .filter(users::email.eq(&req.email))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let Some(user) = user else {
        return Err(ApiError::Unauthorized("Invalid credentials"));
    };

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    let token = create_session(&mut conn, user.id, state.config.session_ttl_days)?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse { auth_token: token }),
    ))
}
