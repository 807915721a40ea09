//! Request-time checks on recipe payloads and credentials.
//!
//! All checks here are pure functions over already-parsed input; handlers
//! are responsible for loading whatever database state a check needs
//! (e.g. the set of ingredient ids that actually exist).

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::FieldViolation;

/// Validate a recipe submission before anything touches the database.
///
/// `ingredients` is the (ingredient id, amount) list as submitted;
/// `tag_count` is the number of tags supplied.
pub fn validate_recipe(
    cooking_time: i32,
    ingredients: &[(Uuid, i32)],
    tag_count: usize,
) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Vec::new();

    if cooking_time <= 0 {
        violations.push(FieldViolation::new(
            "cooking_time",
            "Cooking time must be greater than zero",
        ));
    }

    if ingredients.is_empty() {
        violations.push(FieldViolation::new(
            "ingredients",
            "At least one ingredient is required",
        ));
    }

    let mut seen = HashSet::new();
    for (id, amount) in ingredients {
        if !seen.insert(*id) {
            violations.push(FieldViolation::new(
                "ingredients",
                format!("Ingredient {id} is listed more than once"),
            ));
        }
        if *amount <= 0 {
            violations.push(FieldViolation::new(
                "ingredients",
                format!("Amount for ingredient {id} must be greater than zero"),
            ));
        }
    }

    if tag_count == 0 {
        violations.push(FieldViolation::new("tags", "At least one tag is required"));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// First requested id that does not resolve to an existing row, if any.
pub fn first_missing_id<'a>(
    requested: impl IntoIterator<Item = &'a Uuid>,
    known: &HashSet<Uuid>,
) -> Option<Uuid> {
    requested.into_iter().find(|id| !known.contains(id)).copied()
}

/// Passwords rejected outright regardless of the configured minimum length.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "11111111",
    "iloveyou",
    "letmein",
    "sunshine",
    "admin123",
];

/// Password-strength policy. The minimum length is configurable; the
/// numeric-only, common-password and similarity rules are fixed.
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Check a candidate password against the policy. `username` and
    /// `email` are the account attributes the password must not resemble.
    pub fn check(
        &self,
        password: &str,
        username: &str,
        email: &str,
    ) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        if password.chars().count() < self.min_length {
            violations.push(FieldViolation::new(
                "password",
                format!(
                    "Password must be at least {} characters long",
                    self.min_length
                ),
            ));
        }

        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            violations.push(FieldViolation::new(
                "password",
                "Password cannot be entirely numeric",
            ));
        }

        let lowered = password.to_lowercase();
        if COMMON_PASSWORDS.contains(&lowered.as_str()) {
            violations.push(FieldViolation::new(
                "password",
                "Password is too common",
            ));
        }

        for attribute in [username, email, email.split('@').next().unwrap_or("")] {
            if too_similar(&lowered, attribute) {
                violations.push(FieldViolation::new(
                    "password",
                    "Password is too similar to account details",
                ));
                break;
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn too_similar(password_lowered: &str, attribute: &str) -> bool {
    let attribute = attribute.to_lowercase();
    if attribute.len() < 3 {
        return false;
    }
    password_lowered.contains(&attribute) || attribute.contains(password_lowered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_valid_recipe_passes() {
        let id = Uuid::new_v4();
        assert!(validate_recipe(30, &[(id, 2)], 1).is_ok());
    }

    #[test]
    fn test_zero_cooking_time_rejected() {
        let id = Uuid::new_v4();
        let violations = validate_recipe(0, &[(id, 2)], 1).unwrap_err();
        assert!(violations.iter().any(|v| v.field == "cooking_time"));
    }

    #[test]
    fn test_negative_cooking_time_rejected() {
        let id = Uuid::new_v4();
        assert!(validate_recipe(-5, &[(id, 2)], 1).is_err());
    }

    #[test]
    fn test_empty_ingredients_rejected() {
        let violations = validate_recipe(30, &[], 1).unwrap_err();
        assert!(violations.iter().any(|v| v.field == "ingredients"));
    }

    #[test]
    fn test_duplicate_ingredient_rejected() {
        let id = Uuid::new_v4();
        let violations = validate_recipe(30, &[(id, 2), (id, 3)], 1).unwrap_err();
        assert!(violations
            .iter()
            .any(|v| v.message.contains("more than once")));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let id = Uuid::new_v4();
        assert!(validate_recipe(30, &[(id, 0)], 1).is_err());
    }

    #[test]
    fn test_empty_tags_rejected() {
        let id = Uuid::new_v4();
        let violations = validate_recipe(30, &[(id, 2)], 0).unwrap_err();
        assert!(violations.iter().any(|v| v.field == "tags"));
    }

    #[test]
    fn test_first_missing_id() {
        let known: HashSet<Uuid> = ids(3).into_iter().collect();
        let present: Vec<Uuid> = known.iter().copied().collect();
        assert_eq!(first_missing_id(present.iter(), &known), None);

        let stranger = Uuid::new_v4();
        let mixed = vec![present[0], stranger];
        assert_eq!(first_missing_id(mixed.iter(), &known), Some(stranger));
    }

    #[test]
    fn test_password_too_short() {
        let policy = PasswordPolicy::default();
        assert!(policy.check("abc1234", "carol", "carol@example.com").is_err());
        assert!(policy.check("abcd1234", "carol", "carol@example.com").is_ok());
    }

    #[test]
    fn test_password_all_numeric() {
        let policy = PasswordPolicy::default();
        let violations = policy
            .check("93824754201", "carol", "carol@example.com")
            .unwrap_err();
        assert!(violations.iter().any(|v| v.message.contains("numeric")));
    }

    #[test]
    fn test_password_common() {
        let policy = PasswordPolicy { min_length: 6 };
        assert!(policy.check("letmein", "carol", "carol@example.com").is_err());
    }

    #[test]
    fn test_password_similar_to_username() {
        let policy = PasswordPolicy::default();
        assert!(policy
            .check("carolcarol1", "carol", "carol@example.com")
            .is_err());
    }

    #[test]
    fn test_password_similar_to_email_local_part() {
        let policy = PasswordPolicy::default();
        assert!(policy
            .check("my.name.is.cook99", "somebody", "cook99@example.com")
            .is_err());
    }

    #[test]
    fn test_policy_respects_configured_min_length() {
        let policy = PasswordPolicy { min_length: 12 };
        assert!(policy.check("elevenchars", "u", "u@example.com").is_err());
        assert!(policy.check("twelve-chars", "u", "u@example.com").is_ok());
    }
}
