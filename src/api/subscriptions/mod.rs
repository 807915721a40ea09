pub mod list;
pub mod subscribe;
pub mod unsubscribe;

use std::collections::HashMap;

use diesel::prelude::*;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::api::recipes::RecipeSummary;
use crate::error::ApiError;
use crate::models::{Recipe, User};
use crate::schema::recipes;

/// A followed user together with a preview of their recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Always true: these entries only exist for users the viewer follows.
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummary>,
    /// Total recipe count for the followed user, independent of
    /// `recipes_limit` truncation.
    pub recipes_count: i64,
}

/// Assemble subscription entries for `followed` users: their recipes
/// (newest first, truncated to `recipes_limit` when given) and the
/// untruncated per-author recipe count, loaded in two batch queries.
pub(crate) fn build_subscription_responses(
    conn: &mut PgConnection,
    followed: &[User],
    recipes_limit: Option<usize>,
) -> Result<Vec<SubscriptionResponse>, ApiError> {
    let author_ids: Vec<Uuid> = followed.iter().map(|u| u.id).collect();

    let mut recipes_by_author: HashMap<Uuid, Vec<RecipeSummary>> = HashMap::new();
    let mut counts: HashMap<Uuid, i64> = HashMap::new();

    if !author_ids.is_empty() {
        let loaded: Vec<Recipe> = recipes::table
            .filter(recipes::author_id.eq_any(&author_ids))
            .order(recipes::created_at.desc())
            .select(Recipe::as_select())
            .load(conn)?;

        for recipe in &loaded {
            let entry = recipes_by_author.entry(recipe.author_id).or_default();
            if recipes_limit.map_or(true, |limit| entry.len() < limit) {
                entry.push(RecipeSummary::from_recipe(recipe));
            }
        }

        counts = recipes::table
            .filter(recipes::author_id.eq_any(&author_ids))
            .group_by(recipes::author_id)
            .select((recipes::author_id, diesel::dsl::count_star()))
            .load::<(Uuid, i64)>(conn)?
            .into_iter()
            .collect();
    }

    Ok(followed
        .iter()
        .map(|user| SubscriptionResponse {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed: true,
            recipes: recipes_by_author.remove(&user.id).unwrap_or_default(),
            recipes_count: counts.get(&user.id).copied().unwrap_or(0),
        })
        .collect())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_subscriptions,
        subscribe::subscribe,
        unsubscribe::unsubscribe,
    ),
    components(schemas(SubscriptionResponse, list::ListSubscriptionsResponse))
)]
pub struct ApiDoc;
