use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::users::UserResponse;
use crate::api::{ErrorResponse, PaginationMetadata};
use crate::auth::OptionalAuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::User;
use crate::raw_sql::count_over;
use crate::schema::users;
use crate::viewer::subscribed_set;
use crate::SharedState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Number of items to return (default: 20, max: 1000)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "List of users with subscription flags", body = ListUsersResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_users(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 1000);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut conn = get_conn(&state.pool)?;

    let rows: Vec<(User, i64)> = users::table
        .order(users::username.asc())
        .select((User::as_select(), count_over()))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)?;

    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);

    let user_ids: Vec<Uuid> = rows.iter().map(|(u, _)| u.id).collect();
    let subscribed = subscribed_set(&mut conn, &viewer, &user_ids)?;

    let users = rows
        .iter()
        .map(|(user, _)| UserResponse::from_user(user, subscribed.contains(&user.id)))
        .collect();

    Ok(Json(ListUsersResponse {
        users,
        pagination: PaginationMetadata {
            total,
            limit,
            offset,
        },
    }))
}
