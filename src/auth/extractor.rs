use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::error::ApiError;
use crate::models::User;
use crate::viewer::Viewer;
use crate::SharedState;

use super::db::get_user_from_token;

/// Extractor that validates the Authorization header and provides the
/// authenticated user. Rejects the request when the token is missing,
/// malformed or expired.
pub struct AuthUser(pub User);

/// Extractor for personalized-read endpoints: a missing Authorization
/// header yields an anonymous viewer, but a header that is present and
/// invalid is still rejected.
pub struct OptionalAuthUser(pub Viewer);

/// Extractor that hands the raw bearer token to the handler. Used by
/// logout, which needs the token itself to revoke it.
pub struct BearerToken(pub String);

fn bearer_token(parts: &Parts) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("Invalid Authorization header format"))?;

    Ok(Some(token.to_string()))
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = SharedState::from_ref(state);

        let token = bearer_token(parts)?
            .ok_or(ApiError::Unauthorized("Missing Authorization header"))?;

        let user = get_user_from_token(&state.pool, &token)
            .await
            .ok_or(ApiError::Unauthorized("Invalid or expired token"))?;

        Ok(AuthUser(user))
    }
}

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    SharedState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = SharedState::from_ref(state);

        let Some(token) = bearer_token(parts)? else {
            return Ok(OptionalAuthUser(Viewer::Anonymous));
        };

        let user = get_user_from_token(&state.pool, &token)
            .await
            .ok_or(ApiError::Unauthorized("Invalid or expired token"))?;

        Ok(OptionalAuthUser(Viewer::User(user)))
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or(ApiError::Unauthorized("Missing Authorization header"))?;
        Ok(BearerToken(token))
    }
}
