pub mod create;
pub mod get;
pub mod list;
pub mod set_password;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::api::subscriptions;
use crate::models::User;
use crate::SharedState;

/// Returns the router for /api/users endpoints (mounted at /api/users).
/// Subscription membership lives under the user resource, so those routes
/// are wired here too.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list::list_users).post(create::create_user))
        .route("/subscriptions", get(subscriptions::list::list_subscriptions))
        .route("/set_password", post(set_password::set_password))
        .route("/{id}", get(get::get_user))
        .route(
            "/{id}/subscribe",
            post(subscriptions::subscribe::subscribe)
                .delete(subscriptions::unsubscribe::unsubscribe),
        )
}

/// A user as seen by the current viewer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer is subscribed to this user. Always false for
    /// anonymous viewers.
    pub is_subscribed: bool,
}

impl UserResponse {
    pub fn from_user(user: &User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_users,
        create::create_user,
        get::get_user,
        set_password::set_password,
    ),
    components(schemas(
        UserResponse,
        list::ListUsersResponse,
        create::CreateUserRequest,
        set_password::SetPasswordRequest,
    ))
)]
pub struct ApiDoc;
