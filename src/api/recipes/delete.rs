use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::schema::{favorites, recipe_ingredients, recipe_tags, recipes, shopping_cart_items};
use crate::SharedState;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let author_id: Uuid = recipes::table
        .find(id)
        .select(recipes::author_id)
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Recipe not found"))?;

    if author_id != user.id {
        return Err(ApiError::Forbidden("Only the author can delete a recipe"));
    }

    // Dependent rows go with the recipe in one transaction.
    conn.transaction(|conn| {
        diesel::delete(
            recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)),
        )
        .execute(conn)?;
        diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(id)))
            .execute(conn)?;
        diesel::delete(favorites::table.filter(favorites::recipe_id.eq(id))).execute(conn)?;
        diesel::delete(
            shopping_cart_items::table.filter(shopping_cart_items::recipe_id.eq(id)),
        )
        .execute(conn)?;
        diesel::delete(recipes::table.find(id)).execute(conn)?;
        Ok::<_, diesel::result::Error>(())
    })?;

    Ok(StatusCode::NO_CONTENT)
}
