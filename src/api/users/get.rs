use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::users::UserResponse;
use crate::api::ErrorResponse;
use crate::auth::OptionalAuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use crate::viewer::subscribed_set;
use crate::SharedState;

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with subscription flag", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let user: User = users::table
        .find(id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User not found"))?;

    let subscribed = subscribed_set(&mut conn, &viewer, &[user.id])?;

    Ok(Json(UserResponse::from_user(
        &user,
        subscribed.contains(&user.id),
    )))
}
