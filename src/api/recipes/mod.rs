pub mod create;
pub mod delete;
pub mod download_shopping_cart;
pub mod favorite;
pub mod get;
pub mod list;
pub mod shopping_cart;
pub mod update;
pub mod view;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::models::Recipe;
use crate::SharedState;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/download_shopping_cart",
            get(download_shopping_cart::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/{id}/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
}

/// Compact recipe form embedded in favorite/cart confirmations and
/// subscription previews.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl RecipeSummary {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
        download_shopping_cart::download_shopping_cart,
    ),
    components(schemas(
        RecipeSummary,
        view::RecipeResponse,
        view::IngredientAmountResponse,
        list::ListRecipesResponse,
        create::CreateRecipeRequest,
        create::IngredientAmountRequest,
        update::UpdateRecipeRequest,
        crate::cart::SortOrder,
    ))
)]
pub struct ApiDoc;
