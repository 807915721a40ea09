//! Shopping-cart aggregation: roll all recipes in a user's cart up into
//! one deduplicated ingredient list, then render it as a PDF.

pub mod report;

use std::collections::BTreeMap;

use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::{ingredients, recipe_ingredients, shopping_cart_items};

/// One line of the consolidated shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Sort order for the aggregated list, by total quantity. Exposed as an
/// explicit request parameter; ascending is the default.
#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Every (ingredient name, measurement unit, amount) row reachable from
/// the user's cart, one row per ingredient-amount entry.
pub fn load_cart_rows(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> QueryResult<Vec<(String, String, i32)>> {
    shopping_cart_items::table
        .inner_join(
            recipe_ingredients::table
                .on(recipe_ingredients::recipe_id.eq(shopping_cart_items::recipe_id)),
        )
        .inner_join(ingredients::table.on(ingredients::id.eq(recipe_ingredients::ingredient_id)))
        .filter(shopping_cart_items::user_id.eq(user_id))
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)
}

/// Group rows by (name, measurement unit), sum the amounts, and order by
/// total with name as tiebreaker.
pub fn aggregate(rows: Vec<(String, String, i32)>, order: SortOrder) -> Vec<CartLine> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for (name, unit, amount) in rows {
        *totals.entry((name, unit)).or_insert(0) += i64::from(amount);
    }

    let mut lines: Vec<CartLine> = totals
        .into_iter()
        .map(|((name, measurement_unit), total)| CartLine {
            name,
            measurement_unit,
            total,
        })
        .collect();

    match order {
        SortOrder::Asc => lines.sort_by(|a, b| a.total.cmp(&b.total).then(a.name.cmp(&b.name))),
        SortOrder::Desc => lines.sort_by(|a, b| b.total.cmp(&a.total).then(a.name.cmp(&b.name))),
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, unit: &str, amount: i32) -> (String, String, i32) {
        (name.to_string(), unit.to_string(), amount)
    }

    #[test]
    fn test_same_ingredient_is_summed() {
        let lines = aggregate(
            vec![row("Salt", "g", 2), row("Salt", "g", 3)],
            SortOrder::Asc,
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Salt");
        assert_eq!(lines[0].total, 5);
    }

    #[test]
    fn test_same_name_different_unit_stays_separate() {
        let lines = aggregate(
            vec![row("Milk", "ml", 200), row("Milk", "cup", 1)],
            SortOrder::Asc,
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_ascending_order_by_total() {
        let lines = aggregate(
            vec![row("Flour", "g", 500), row("Salt", "g", 5), row("Sugar", "g", 50)],
            SortOrder::Asc,
        );
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Salt", "Sugar", "Flour"]);
    }

    #[test]
    fn test_descending_order_by_total() {
        let lines = aggregate(
            vec![row("Flour", "g", 500), row("Salt", "g", 5), row("Sugar", "g", 50)],
            SortOrder::Desc,
        );
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Flour", "Sugar", "Salt"]);
    }

    #[test]
    fn test_equal_totals_break_ties_by_name() {
        let lines = aggregate(
            vec![row("Pepper", "g", 10), row("Basil", "g", 10)],
            SortOrder::Asc,
        );
        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Basil", "Pepper"]);
    }

    #[test]
    fn test_empty_cart_aggregates_to_nothing() {
        assert!(aggregate(vec![], SortOrder::Asc).is_empty());
    }
}
