pub mod get;
pub mod list;

use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::models::Ingredient;
use crate::SharedState;

/// Returns the router for /api/ingredients endpoints (mounted at /api/ingredients)
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list::list_ingredients))
        .route("/{id}", get(get::get_ingredient))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientResponse {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

impl IngredientResponse {
    pub fn from_ingredient(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_ingredients, get::get_ingredient),
    components(schemas(IngredientResponse))
)]
pub struct ApiDoc;
