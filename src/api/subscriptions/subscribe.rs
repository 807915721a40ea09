use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::subscriptions::{build_subscription_responses, SubscriptionResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::{NewSubscription, User};
use crate::schema::{subscriptions, users};
use crate::SharedState;

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "subscriptions",
    params(("id" = Uuid, Path, description = "User to follow")),
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Already subscribed, or subscribing to yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if user.id == id {
        return Err(ApiError::BadRequest(
            "Cannot subscribe to yourself".to_string(),
        ));
    }

    let mut conn = get_conn(&state.pool)?;

    let followed: User = users::table
        .find(id)
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("User not found"))?;

    let new_subscription = NewSubscription {
        follower_id: user.id,
        followed_id: followed.id,
    };

    match diesel::insert_into(subscriptions::table)
        .values(&new_subscription)
        .execute(&mut conn)
    {
        Ok(_) => {}
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return Err(ApiError::BadRequest("Already subscribed".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let mut responses = build_subscription_responses(&mut conn, &[followed], None)?;
    let response = responses.pop().ok_or(ApiError::NotFound("User not found"))?;

    Ok((StatusCode::CREATED, Json(response)))
}
