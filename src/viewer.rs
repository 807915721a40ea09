//! Per-request viewer identity and the derived read-view flags.
//!
//! The viewer is always passed explicitly as a parameter; there is no
//! ambient request state. Flags are computed in one batch query per
//! relation so list endpoints never degrade into per-row lookups.

use std::collections::HashSet;

use diesel::prelude::*;
use uuid::Uuid;

use crate::models::User;
use crate::schema::{favorites, shopping_cart_items, subscriptions};

/// The identity making the current request.
pub enum Viewer {
    Anonymous,
    User(User),
}

impl Viewer {
    pub fn user(&self) -> Option<&User> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(user) => Some(user),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.user().map(|u| u.id)
    }
}

/// Favorite / shopping-cart membership for a set of recipes, as seen by
/// one viewer. The default (empty) value answers false for every recipe,
/// which is exactly the anonymous contract.
#[derive(Debug, Default)]
pub struct RecipeFlagSet {
    favorited: HashSet<Uuid>,
    in_cart: HashSet<Uuid>,
}

#[derive(Debug, Clone, Copy)]
pub struct RecipeFlags {
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeFlagSet {
    pub fn flags_for(&self, recipe_id: Uuid) -> RecipeFlags {
        RecipeFlags {
            is_favorited: self.favorited.contains(&recipe_id),
            is_in_shopping_cart: self.in_cart.contains(&recipe_id),
        }
    }
}

/// Compute favorite/cart flags for `recipe_ids`. Anonymous viewers get
/// constant false without touching the database.
pub fn recipe_flags(
    conn: &mut PgConnection,
    viewer: &Viewer,
    recipe_ids: &[Uuid],
) -> QueryResult<RecipeFlagSet> {
    let Some(user_id) = viewer.id() else {
        return Ok(RecipeFlagSet::default());
    };
    if recipe_ids.is_empty() {
        return Ok(RecipeFlagSet::default());
    }

    let favorited = favorites::table
        .filter(favorites::user_id.eq(user_id))
        .filter(favorites::recipe_id.eq_any(recipe_ids))
        .select(favorites::recipe_id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();

    let in_cart = shopping_cart_items::table
        .filter(shopping_cart_items::user_id.eq(user_id))
        .filter(shopping_cart_items::recipe_id.eq_any(recipe_ids))
        .select(shopping_cart_items::recipe_id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect();

    Ok(RecipeFlagSet { favorited, in_cart })
}

/// Which of `user_ids` the viewer is subscribed to. Anonymous viewers get
/// an empty set without touching the database.
pub fn subscribed_set(
    conn: &mut PgConnection,
    viewer: &Viewer,
    user_ids: &[Uuid],
) -> QueryResult<HashSet<Uuid>> {
    let Some(follower_id) = viewer.id() else {
        return Ok(HashSet::new());
    };
    if user_ids.is_empty() {
        return Ok(HashSet::new());
    }

    Ok(subscriptions::table
        .filter(subscriptions::follower_id.eq(follower_id))
        .filter(subscriptions::followed_id.eq_any(user_ids))
        .select(subscriptions::followed_id)
        .load::<Uuid>(conn)?
        .into_iter()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_viewer_has_no_id() {
        assert!(Viewer::Anonymous.id().is_none());
        assert!(Viewer::Anonymous.user().is_none());
    }

    #[test]
    fn test_empty_flag_set_answers_false() {
        let flags = RecipeFlagSet::default().flags_for(Uuid::new_v4());
        assert!(!flags.is_favorited);
        assert!(!flags.is_in_shopping_cart);
    }

    #[test]
    fn test_flag_set_membership() {
        let favorited_id = Uuid::new_v4();
        let carted_id = Uuid::new_v4();
        let set = RecipeFlagSet {
            favorited: [favorited_id].into_iter().collect(),
            in_cart: [carted_id].into_iter().collect(),
        };

        let flags = set.flags_for(favorited_id);
        assert!(flags.is_favorited);
        assert!(!flags.is_in_shopping_cart);

        let flags = set.flags_for(carted_id);
        assert!(!flags.is_favorited);
        assert!(flags.is_in_shopping_cart);
    }
}
