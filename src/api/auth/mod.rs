pub mod login;
pub mod logout;

use crate::SharedState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/auth endpoints (mounted at /api/auth)
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/token/login", post(login::login))
        .route("/token/logout", post(logout::logout))
}

#[derive(OpenApi)]
#[openapi(
    paths(login::login, logout::logout),
    components(schemas(login::LoginRequest, login::TokenResponse))
)]
pub struct ApiDoc;
