use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::recipes::view::{build_recipe_responses, RecipeResponse};
use crate::api::{ErrorResponse, PaginationMetadata};
use crate::auth::OptionalAuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::Recipe;
use crate::raw_sql::count_over;
use crate::schema::{favorites, recipe_tags, recipes, shopping_cart_items, tags};
use crate::SharedState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 20, max: 1000)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Only recipes by this author
    pub author: Option<Uuid>,
    /// Comma-separated tag slugs; a recipe matches if it carries any of them
    pub tags: Option<String>,
    /// Only recipes the viewer has (not) favorited. Requires a token to
    /// ever match with `true`.
    pub is_favorited: Option<bool>,
    /// Only recipes in (or not in) the viewer's shopping cart
    pub is_in_shopping_cart: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeResponse>,
    pub pagination: PaginationMetadata,
}

fn parse_slugs(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipes visible to the viewer", body = ListRecipesResponse),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListRecipesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 1000);
    let offset = params.offset.unwrap_or(0).max(0);

    // Anonymous viewers have constant-false flags, so a positive
    // viewer-dependent filter can never match anything.
    let unsatisfiable = viewer.id().is_none()
        && (params.is_favorited == Some(true) || params.is_in_shopping_cart == Some(true));
    if unsatisfiable {
        return Ok(Json(ListRecipesResponse {
            recipes: Vec::new(),
            pagination: PaginationMetadata {
                total: 0,
                limit,
                offset,
            },
        }));
    }

    let mut conn = get_conn(&state.pool)?;

    let mut query = recipes::table.into_boxed();

    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(author));
    }

    let slugs = parse_slugs(params.tags.as_deref());
    if !slugs.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(slugs))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }

    if let Some(viewer_id) = viewer.id() {
        if let Some(wanted) = params.is_favorited {
            let favorited = favorites::table
                .filter(favorites::user_id.eq(viewer_id))
                .select(favorites::recipe_id);
            query = if wanted {
                query.filter(recipes::id.eq_any(favorited))
            } else {
                query.filter(diesel::dsl::not(recipes::id.eq_any(favorited)))
            };
        }

        if let Some(wanted) = params.is_in_shopping_cart {
            let in_cart = shopping_cart_items::table
                .filter(shopping_cart_items::user_id.eq(viewer_id))
                .select(shopping_cart_items::recipe_id);
            query = if wanted {
                query.filter(recipes::id.eq_any(in_cart))
            } else {
                query.filter(diesel::dsl::not(recipes::id.eq_any(in_cart)))
            };
        }
    }

    let rows: Vec<(Recipe, i64)> = query
        .order(recipes::created_at.desc())
        .select((Recipe::as_select(), count_over()))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)?;

    let total = rows.first().map(|(_, total)| *total).unwrap_or(0);
    let page: Vec<Recipe> = rows.into_iter().map(|(r, _)| r).collect();

    let recipes = build_recipe_responses(&mut conn, &viewer, page)?;

    Ok(Json(ListRecipesResponse {
        recipes,
        pagination: PaginationMetadata {
            total,
            limit,
            offset,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slugs_none() {
        assert!(parse_slugs(None).is_empty());
    }

    #[test]
    fn test_parse_slugs_splits_and_trims() {
        assert_eq!(
            parse_slugs(Some("breakfast, dinner ,quick")),
            vec!["breakfast", "dinner", "quick"]
        );
    }

    #[test]
    fn test_parse_slugs_drops_empty_segments() {
        assert_eq!(parse_slugs(Some(",,dinner,")), vec!["dinner"]);
    }
}
