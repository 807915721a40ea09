use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;

use crate::api::tags::TagResponse;
use crate::db::get_conn;
use crate::error::ApiError;
use crate::models::Tag;
use crate::schema::tags;
use crate::SharedState;

/// Tag lookup is a small fixed vocabulary, so the list is unpaginated.
#[utoipa::path(
    get,
    path = "/api/tags",
    tag = "tags",
    responses(
        (status = 200, description = "All tags", body = [TagResponse])
    )
)]
pub async fn list_tags(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let tags: Vec<Tag> = tags::table
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load(&mut conn)?;

    Ok(Json(
        tags.iter().map(TagResponse::from_tag).collect::<Vec<_>>(),
    ))
}
