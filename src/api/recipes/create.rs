use std::collections::HashSet;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::recipes::view::{build_recipe_response, RecipeResponse};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::{NewRecipe, NewRecipeIngredient, NewRecipeTag, Recipe};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, recipes, tags};
use crate::validation::{first_missing_id, validate_recipe};
use crate::viewer::Viewer;
use crate::SharedState;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    pub id: Uuid,
    pub amount: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<Uuid>,
}

/// Run the pure payload checks, then verify every referenced ingredient
/// and tag id actually exists. Shared by create and update.
pub(super) fn check_recipe_payload(
    conn: &mut PgConnection,
    cooking_time: i32,
    ingredient_amounts: &[IngredientAmountRequest],
    tag_ids: &[Uuid],
) -> Result<(), ApiError> {
    let pairs: Vec<(Uuid, i32)> = ingredient_amounts
        .iter()
        .map(|entry| (entry.id, entry.amount))
        .collect();
    validate_recipe(cooking_time, &pairs, tag_ids.len()).map_err(ApiError::Validation)?;

    let requested_ingredients: Vec<Uuid> = ingredient_amounts.iter().map(|e| e.id).collect();
    let known_ingredients: HashSet<Uuid> = ingredients::table
        .filter(ingredients::id.eq_any(&requested_ingredients))
        .select(ingredients::id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();
    if first_missing_id(requested_ingredients.iter(), &known_ingredients).is_some() {
        return Err(ApiError::NotFound("Ingredient not found"));
    }

    let known_tags: HashSet<Uuid> = tags::table
        .filter(tags::id.eq_any(tag_ids))
        .select(tags::id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();
    if first_missing_id(tag_ids.iter(), &known_tags).is_some() {
        return Err(ApiError::NotFound("Tag not found"));
    }

    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Referenced ingredient or tag not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    check_recipe_payload(
        &mut conn,
        request.cooking_time,
        &request.ingredients,
        &request.tags,
    )?;

    // Recipe row, tag links and ingredient amounts land atomically.
    let recipe: Recipe = conn.transaction(|conn| {
        let new_recipe = NewRecipe {
            author_id: user.id,
            name: &request.name,
            text: &request.text,
            image: request.image.as_deref(),
            cooking_time: request.cooking_time,
        };

        let recipe: Recipe = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(Recipe::as_returning())
            .get_result(conn)?;

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

        Ok::<_, diesel::result::Error>(recipe)
    })?;

    let response = build_recipe_response(&mut conn, &Viewer::User(user), recipe)?;

    Ok((StatusCode::CREATED, Json(response)))
}
