use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::cart::report::{render_shopping_list, ATTACHMENT_FILENAME};
use crate::cart::{aggregate, load_cart_rows, SortOrder};
use crate::db::get_conn;
use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DownloadShoppingCartParams {
    /// Sort order for the aggregated totals (default: asc)
    #[serde(default)]
    pub order: SortOrder,
}

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart",
    tag = "recipes",
    params(DownloadShoppingCartParams),
    responses(
        (status = 200, description = "Consolidated shopping list", content_type = "application/pdf"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<DownloadShoppingCartParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = get_conn(&state.pool)?;

    let rows = load_cart_rows(&mut conn, user.id)?;
    let lines = aggregate(rows, params.order);
    let pdf = render_shopping_list(&lines)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{ATTACHMENT_FILENAME}\""),
            ),
        ],
        pdf,
    ))
}
