pub mod get;
pub mod list;

use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::models::Tag;
use crate::SharedState;

/// Returns the router for /api/tags endpoints (mounted at /api/tags)
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list::list_tags))
        .route("/{id}", get(get::get_tag))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    /// Display color as a hex string, e.g. "#49B64E"
    pub color: String,
    pub slug: String,
}

impl TagResponse {
    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            color: tag.color.clone(),
            slug: tag.slug.clone(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_tags, get::get_tag),
    components(schemas(TagResponse))
)]
pub struct ApiDoc;
