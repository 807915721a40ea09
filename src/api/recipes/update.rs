use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::recipes::create::{check_recipe_payload, IngredientAmountRequest};
use crate::api::recipes::view::{build_recipe_response, RecipeResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::{NewRecipeIngredient, NewRecipeTag, Recipe};
use crate::schema::{recipe_ingredients, recipe_tags, recipes};
use crate::viewer::Viewer;
use crate::SharedState;

/// Full-replace payload; tag links and ingredient amounts are rewritten
/// from what is submitted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRecipeRequest {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<Uuid>,
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let recipe: Recipe = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;

    if recipe.author_id != user.id {
        return Err(ApiError::Forbidden("Only the author can edit a recipe"));
    }

    check_recipe_payload(
        &mut conn,
        request.cooking_time,
        &request.ingredients,
        &request.tags,
    )?;

    let updated: Recipe = conn.transaction(|conn| {
        let updated: Recipe = diesel::update(recipes::table.find(recipe.id))
            .set((
                recipes::name.eq(&request.name),
                recipes::text.eq(&request.text),
                recipes::image.eq(request.image.as_deref()),
                recipes::cooking_time.eq(request.cooking_time),
                recipes::updated_at.eq(diesel::dsl::now),
            ))
            .returning(Recipe::as_returning())
            .get_result(conn)?;

        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe.id)))
            .execute(conn)?;
        let tag_links: Vec<NewRecipeTag> = request
            .tags
            .iter()
            .map(|tag_id| NewRecipeTag {
                recipe_id: recipe.id,
                tag_id: *tag_id,
            })
            .collect();
        diesel::insert_into(recipe_tags::table)
            .values(&tag_links)
            .execute(conn)?;

        diesel::delete(
            recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe.id)),
        )
        .execute(conn)?;
        let amounts: Vec<NewRecipeIngredient> = request
            .ingredients
            .iter()
            .map(|entry| NewRecipeIngredient {
                recipe_id: recipe.id,
                ingredient_id: entry.id,
                amount: entry.amount,
            })
            .collect();
        diesel::insert_into(recipe_ingredients::table)
            .values(&amounts)
            .execute(conn)?;

        Ok::<_, diesel::result::Error>(updated)
    })?;

    let response = build_recipe_response(&mut conn, &Viewer::User(user), updated)?;

    Ok(Json(response))
}
