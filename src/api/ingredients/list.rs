use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::ingredients::IngredientResponse;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use crate::SharedState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListIngredientsParams {
    /// Case-sensitive name prefix filter
    pub name: Option<String>,
}

fn escape_like(input: &str) -> String {
    input.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Ingredient lookup feeds a typeahead, so the list is unpaginated.
#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Ingredients, optionally filtered by name prefix", body = [IngredientResponse])
    )
)]
pub async fn list_ingredients(
    State(state): State<SharedState>,
    Query(params): Query<ListIngredientsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let mut query = ingredients::table.into_boxed();

    if let Some(ref prefix) = params.name {
        query = query.filter(ingredients::name.like(format!("{}%", escape_like(prefix))));
    }

    let loaded: Vec<Ingredient> = query
        .order(ingredients::name.asc())
        .select(Ingredient::as_select())
        .load(&mut conn)?;

    Ok(Json(
        loaded
            .iter()
            .map(IngredientResponse::from_ingredient)
            .collect::<Vec<_>>(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passes_plain_text() {
        assert_eq!(escape_like("salt"), "salt");
    }

    #[test]
    fn test_escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_pure"), "100\\%\\_pure");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
