use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::subscriptions::{build_subscription_responses, SubscriptionResponse};
use crate::api::{ErrorResponse, PaginationMetadata};
use crate::auth::AuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::User;
use crate::raw_sql::count_over;
use crate::schema::{subscriptions, users};
use crate::SharedState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListSubscriptionsParams {
    /// Number of items to return (default: 20, max: 1000)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Cap on how many recipes to embed per followed user
    pub recipes_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListSubscriptionsResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/users/subscriptions",
    tag = "subscriptions",
    params(ListSubscriptionsParams),
    responses(
        (status = 200, description = "Users the viewer follows, with recipe previews", body = ListSubscriptionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListSubscriptionsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 1000);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut conn = get_conn(&state.pool)?;

    let rows: Vec<(User, i64)> = subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::followed_id)))
        .filter(subscriptions::follower_id.eq(user.id))
        .order(subscriptions::created_at.desc())
        .select((User::as_select(), count_over()))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)?;

    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let followed: Vec<User> = rows.into_iter().map(|(u, _)| u).collect();

    let subscriptions =
        build_subscription_responses(&mut conn, &followed, params.recipes_limit)?;

    Ok(Json(ListSubscriptionsResponse {
        subscriptions,
        pagination: PaginationMetadata {
            total,
            limit,
            offset,
        },
    }))
}
