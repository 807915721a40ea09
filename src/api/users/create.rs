use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::users::UserResponse;
use crate::api::ErrorResponse;
use crate::auth::hash_password;
use crate::db::get_conn;
use crate::error::{ApiError, FieldViolation};
use crate::models::{NewUser, User};
use crate::schema::users;
use crate::SharedState;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<SharedState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut violations = Vec::new();
    if req.email.trim().is_empty() {
        violations.push(FieldViolation::new("email", "Email cannot be empty"));
    }
    if req.username.trim().is_empty() {
        violations.push(FieldViolation::new("username", "Username cannot be empty"));
    }
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    state
        .config
        .password_policy
        .check(&req.password, &req.username, &req.email)
        .map_err(ApiError::Validation)?;

    let password_hash = hash_password(&req.password)
        .map_err(|_| ApiError::BadRequest("Failed to hash password".to_string()))?;

    let new_user = NewUser {
        email: &req.email,
        username: &req.username,
        first_name: &req.first_name,
        last_name: &req.last_name,
        password_hash: &password_hash,
    };

    let mut conn = get_conn(&state.pool)?;

    let user: User = match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(&mut conn)
    {
        Ok(u) => u,
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return Err(ApiError::BadRequest(
                "Email or username is already taken".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::from_user(&user, false)),
    ))
}
