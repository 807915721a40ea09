use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::ingredients::IngredientResponse;
use crate::api::ErrorResponse;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use crate::SharedState;

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}",
    tag = "ingredients",
    params(("id" = Uuid, Path, description = "Ingredient ID")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let ingredient: Ingredient = ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Ingredient not found"))?;

    Ok(Json(IngredientResponse::from_ingredient(&ingredient)))
}
