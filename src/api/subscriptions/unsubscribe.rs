use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::schema::subscriptions;
use crate::SharedState;

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "User to unfollow")),
    responses(
        (status = 204, description = "Subscription removed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Subscription not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let deleted = diesel::delete(
        subscriptions::table
            .filter(subscriptions::follower_id.eq(user.id))
            .filter(subscriptions::followed_id.eq(id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Subscription not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
