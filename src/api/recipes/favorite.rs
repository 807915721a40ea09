use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::recipes::RecipeSummary;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::{NewFavorite, Recipe};
use crate::schema::{favorites, recipes};
use crate::SharedState;

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 201, description = "Recipe favorited (idempotent)", body = RecipeSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let recipe: Recipe = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;

    // Adding twice is a no-op thanks to the (user, recipe) primary key.
    diesel::insert_into(favorites::table)
        .values(&NewFavorite {
            user_id: user.id,
            recipe_id: recipe.id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    Ok((StatusCode::CREATED, Json(RecipeSummary::from_recipe(&recipe))))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe removed from favorites"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe is not in favorites", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let deleted = diesel::delete(
        favorites::table
            .filter(favorites::user_id.eq(user.id))
            .filter(favorites::recipe_id.eq(id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Recipe is not in favorites"));
    }

    Ok(StatusCode::NO_CONTENT)
}
