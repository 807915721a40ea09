use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::recipes::view::{build_recipe_response, RecipeResponse};
use crate::api::ErrorResponse;
use crate::auth::OptionalAuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::Recipe;
use crate::schema::recipes;
use crate::SharedState;

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe as seen by the viewer", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    OptionalAuthUser(viewer): OptionalAuthUser,
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

    let response = build_recipe_response(&mut conn, &viewer, recipe)?;

    Ok(Json(response))
}
