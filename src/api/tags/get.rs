use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use uuid::Uuid;

use crate::api::tags::TagResponse;
use crate::api::ErrorResponse;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::Tag;
use crate::schema::tags;
use crate::SharedState;

#[utoipa::path(
    get,
    path = "/api/tags/{id}",
    tag = "tags",
    params(("id" = Uuid, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let tag: Tag = tags::table
        .find(id)
        .select(Tag::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(ApiError::NotFound("Tag not found"))?;

    Ok(Json(TagResponse::from_tag(&tag)))
}
