//! Assembles full recipe read views for a given viewer.
//!
//! Everything is loaded in batches keyed by recipe id so a page of
//! recipes costs a fixed number of queries regardless of page size.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::tags::TagResponse;
use crate::api::users::UserResponse;
use crate::error::ApiError;
use crate::models::{Ingredient, Recipe, Tag, User};
use crate::schema::{ingredients, recipe_ingredients, recipe_tags, tags, users};
use crate::viewer::{recipe_flags, subscribed_set, Viewer};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientAmountResponse {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub author: UserResponse,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<IngredientAmountResponse>,
    /// Always false for anonymous viewers.
    pub is_favorited: bool,
    /// Always false for anonymous viewers.
    pub is_in_shopping_cart: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Build full read views for `recipes`, preserving their order.
pub fn build_recipe_responses(
    conn: &mut PgConnection,
    viewer: &Viewer,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeResponse>, ApiError> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = recipes.iter().map(|r| r.author_id).collect();

    let authors: HashMap<Uuid, User> = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(conn)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let subscribed = subscribed_set(conn, viewer, &author_ids)?;
    let flags = recipe_flags(conn, viewer, &recipe_ids)?;

    let mut tags_by_recipe: HashMap<Uuid, Vec<TagResponse>> = HashMap::new();
    let tag_rows: Vec<(Uuid, Tag)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&recipe_ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load(conn)?;
    for (recipe_id, tag) in &tag_rows {
        tags_by_recipe
            .entry(*recipe_id)
            .or_default()
            .push(TagResponse::from_tag(tag));
    }

    let mut ingredients_by_recipe: HashMap<Uuid, Vec<IngredientAmountResponse>> = HashMap::new();
    let ingredient_rows: Vec<(Uuid, i32, Ingredient)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&recipe_ids))
        .order(ingredients::name.asc())
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            Ingredient::as_select(),
        ))
        .load(conn)?;
    for (recipe_id, amount, ingredient) in &ingredient_rows {
        ingredients_by_recipe
            .entry(*recipe_id)
            .or_default()
            .push(IngredientAmountResponse {
                id: ingredient.id,
                name: ingredient.name.clone(),
                measurement_unit: ingredient.measurement_unit.clone(),
                amount: *amount,
            });
    }

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors
                .get(&recipe.author_id)
                .ok_or(ApiError::NotFound("Recipe author not found"))?;
            let recipe_flags = flags.flags_for(recipe.id);

            Ok(RecipeResponse {
                id: recipe.id,
                name: recipe.name,
                text: recipe.text,
                image: recipe.image,
                cooking_time: recipe.cooking_time,
                author: UserResponse::from_user(author, subscribed.contains(&author.id)),
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: recipe_flags.is_favorited,
                is_in_shopping_cart: recipe_flags.is_in_shopping_cart,
                created_at: recipe.created_at,
                updated_at: recipe.updated_at,
            })
        })
        .collect()
}

/// Build the read view for a single recipe.
pub fn build_recipe_response(
    conn: &mut PgConnection,
    viewer: &Viewer,
    recipe: Recipe,
) -> Result<RecipeResponse, ApiError> {
    build_recipe_responses(conn, viewer, vec![recipe])?
        .pop()
        .ok_or(ApiError::NotFound("Recipe not found"))
}
