use chrono::{Duration, Utc};
use diesel::prelude::*;

use crate::db::DbPool;
use crate::models::{NewSession, User};
use crate::schema::{sessions, users};

use super::crypto::{generate_token, hash_token};

/// Issue a new session for `user_id` and return the raw bearer token.
/// Only the token's hash is persisted.
pub fn create_session(
    conn: &mut PgConnection,
    user_id: uuid::Uuid,
    ttl_days: i64,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(ttl_days);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Option<User> {
    let mut conn = pool.get().ok()?;
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(&mut conn)
        .ok()
}

/// Revoke the session behind `token`. Returns how many rows were removed
/// (zero when the token was already invalid).
pub fn delete_session(
    conn: &mut PgConnection,
    token: &str,
) -> Result<usize, diesel::result::Error> {
    let token_hash = hash_token(token);
    diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)
}
